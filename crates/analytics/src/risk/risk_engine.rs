//! Portfolio risk statistics: concentration, volatility, VaR and correlation.

use std::collections::HashMap;

use log::{debug, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::config::{DiversificationBasis, RiskConfig};
use crate::constants::{
    DECIMAL_PRECISION, DISPLAY_DECIMAL_PRECISION, HUNDRED, MIN_TREND_RETURNS, TAIL_PROBABILITY_95,
    TAIL_PROBABILITY_99,
};
use crate::errors::Result;
use crate::portfolio::{PortfolioSnapshot, RiskLevel, ValuePoint};
use crate::validation::ensure_non_negative;

use super::statistics::{
    aggregate_common_timestamps, align_pair, infer_frequency, max_drawdown, mean,
    paired_returns, pearson, period_returns, sample_std_dev,
};
use super::{
    CorrelationMatrix, RiskDistribution, SectorConcentration, ValueAtRisk, VolatilityReport,
    VolatilityTrend,
};

/// Stateless calculator for snapshot-level risk metrics.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyticsEngine {
    config: RiskConfig,
}

impl RiskAnalyticsEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    // =========================================================================
    // Concentration
    // =========================================================================

    /// Herfindahl-Hirschman index of current-value shares (0..=1).
    ///
    /// `None` when the snapshot is empty or holds no value, since shares are undefined.
    pub fn herfindahl_index(&self, snapshot: &PortfolioSnapshot) -> Option<Decimal> {
        let total = snapshot.total_value();
        if snapshot.is_empty() || total <= Decimal::ZERO {
            return None;
        }

        let bucket_values: Vec<Decimal> = match self.config.diversification_basis {
            DiversificationBasis::Holding => {
                snapshot.holdings.iter().map(|h| h.current_value).collect()
            }
            DiversificationBasis::Category => snapshot
                .category_values()
                .into_iter()
                .map(|(_, value, _)| value)
                .collect(),
        };

        let hhi: Decimal = bucket_values
            .iter()
            .map(|value| {
                let share = value / total;
                share * share
            })
            .sum();
        Some(hhi.min(Decimal::ONE))
    }

    /// `100 * (1 - HHI)`: 0 for a single position, approaching 100 as value spreads out.
    pub fn diversification_index(&self, snapshot: &PortfolioSnapshot) -> Decimal {
        match self.herfindahl_index(snapshot) {
            Some(hhi) => (HUNDRED * (Decimal::ONE - hhi)).round_dp(DECIMAL_PRECISION),
            None => {
                if !snapshot.is_empty() {
                    warn!("Portfolio has holdings but no current value; diversification is 0");
                }
                Decimal::ZERO
            }
        }
    }

    /// Current value per category as a share of the portfolio, largest first.
    pub fn sector_concentration(&self, snapshot: &PortfolioSnapshot) -> Vec<SectorConcentration> {
        let total = snapshot.total_value();
        snapshot
            .category_values()
            .into_iter()
            .map(|(sector, value, holding_count)| SectorConcentration {
                sector,
                value,
                percentage: if total > Decimal::ZERO {
                    (value / total * HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION)
                } else {
                    Decimal::ZERO
                },
                holding_count,
            })
            .collect()
    }

    /// Buckets holdings by risk level. Percentages sum to 100 for any non-empty
    /// snapshot; when nothing has value the shares fall back to holding counts.
    pub fn risk_distribution(&self, snapshot: &PortfolioSnapshot) -> RiskDistribution {
        let mut distribution = RiskDistribution::default();
        if snapshot.is_empty() {
            return distribution;
        }

        for holding in &snapshot.holdings {
            let bucket = distribution.bucket_mut(holding.risk_level);
            bucket.count += 1;
            bucket.value += holding.current_value;
        }

        let total_value = snapshot.total_value();
        let total_count = Decimal::from(snapshot.len());
        for level in RiskLevel::ALL {
            let bucket = distribution.bucket_mut(level);
            let share = if total_value > Decimal::ZERO {
                bucket.value / total_value
            } else {
                Decimal::from(bucket.count) / total_count
            };
            bucket.percentage = (share * HUNDRED).round_dp(DECIMAL_PRECISION);
        }

        distribution
    }

    // =========================================================================
    // Volatility
    // =========================================================================

    /// Portfolio value series: holdings summed over their common timestamps.
    pub fn portfolio_series(&self, snapshot: &PortfolioSnapshot) -> Vec<ValuePoint> {
        let series: Vec<&[ValuePoint]> = snapshot
            .holdings
            .iter()
            .map(|h| h.value_series.as_slice())
            .collect();

        let without_history = series.iter().filter(|s| s.is_empty()).count();
        if without_history > 0 && without_history < series.len() {
            debug!(
                "{} of {} holdings have no value history and are left out of the portfolio series",
                without_history,
                series.len()
            );
        }

        aggregate_common_timestamps(&series)
    }

    /// Annualized dispersion of the portfolio series.
    ///
    /// Series whose returns or statistics fall outside the `Decimal` range are
    /// reported the same way as series with too little history.
    pub fn volatility(&self, snapshot: &PortfolioSnapshot) -> VolatilityReport {
        let series = self.portfolio_series(snapshot);
        let values: Vec<Decimal> = series.iter().map(|p| p.value).collect();
        let Some(returns) = period_returns(&values) else {
            warn!("Period returns overflow; volatility is not estimated");
            return VolatilityReport::insufficient(series.len());
        };

        let frequency = match infer_frequency(&series) {
            Some(frequency) if returns.len() >= 2 => frequency,
            _ => {
                if !snapshot.is_empty() {
                    warn!(
                        "Not enough history to estimate volatility ({} aligned points)",
                        series.len()
                    );
                }
                return VolatilityReport::insufficient(series.len());
            }
        };

        let periods_per_year = Decimal::from(frequency.periods_per_year());
        let annualization = periods_per_year.sqrt().unwrap_or(Decimal::ONE);
        let annualized = sample_std_dev(&returns)
            .and_then(|sd| sd.checked_mul(annualization))
            .and_then(|sd| sd.checked_mul(HUNDRED))
            .zip(
                mean(&returns)
                    .and_then(|m| m.checked_mul(periods_per_year))
                    .and_then(|m| m.checked_mul(HUNDRED)),
            );
        let Some((historical, mean_annual_return)) = annualized else {
            warn!(
                "Annualized statistics overflow over {} returns; volatility is not estimated",
                returns.len()
            );
            return VolatilityReport::insufficient(series.len());
        };

        debug!(
            "Volatility {:.4}% over {} {:?} returns",
            historical,
            returns.len(),
            frequency
        );

        VolatilityReport {
            historical: historical.round_dp(DECIMAL_PRECISION),
            data_points: series.len(),
            frequency: Some(frequency),
            mean_annual_return: mean_annual_return.round_dp(DECIMAL_PRECISION),
            max_drawdown: (max_drawdown(&values) * HUNDRED).round_dp(DECIMAL_PRECISION),
        }
    }

    /// Compares the latest rolling-volatility window with the one before it.
    pub fn volatility_trend(&self, snapshot: &PortfolioSnapshot) -> VolatilityTrend {
        let values: Vec<Decimal> = self
            .portfolio_series(snapshot)
            .iter()
            .map(|p| p.value)
            .collect();
        let returns = match period_returns(&values) {
            Some(returns) if returns.len() >= MIN_TREND_RETURNS => returns,
            _ => return VolatilityTrend::InsufficientData,
        };

        let window = self.config.trend_window.min(returns.len() / 2);
        let latest = sample_std_dev(&returns[returns.len() - window..]);
        let prior = sample_std_dev(&returns[returns.len() - 2 * window..returns.len() - window]);
        let (Some(latest), Some(prior)) = (latest, prior) else {
            return VolatilityTrend::InsufficientData;
        };

        if prior.is_zero() {
            return if latest.is_zero() {
                VolatilityTrend::Stable
            } else {
                VolatilityTrend::Increasing
            };
        }

        let tolerance = self.config.trend_tolerance_percent / HUNDRED;
        let Some(change) = latest.checked_div(prior).map(|ratio| ratio - Decimal::ONE) else {
            return VolatilityTrend::Increasing;
        };
        if change > tolerance {
            VolatilityTrend::Increasing
        } else if change < -tolerance {
            VolatilityTrend::Decreasing
        } else {
            VolatilityTrend::Stable
        }
    }

    // =========================================================================
    // Risk-adjusted return and loss estimates
    // =========================================================================

    /// Excess return per unit of volatility; 0 when volatility is 0.
    pub fn sharpe_ratio(
        &self,
        mean_annual_return: Decimal,
        volatility: Decimal,
        risk_free_rate: Decimal,
    ) -> Decimal {
        if volatility.is_zero() {
            return Decimal::ZERO;
        }
        mean_annual_return
            .checked_sub(risk_free_rate)
            .and_then(|excess| excess.checked_div(volatility))
            .map_or(Decimal::ZERO, |ratio| ratio.round_dp(DECIMAL_PRECISION))
    }

    /// Parametric VaR and expected shortfall for a long-only portfolio.
    ///
    /// `volatility` is in percent. Losses are capped at `portfolio_value`,
    /// including losses too large to represent.
    pub fn value_at_risk(&self, portfolio_value: Decimal, volatility: Decimal) -> Result<ValueAtRisk> {
        ensure_non_negative("portfolioValue", portfolio_value)?;
        ensure_non_negative("volatility", volatility)?;

        if portfolio_value.is_zero() || volatility.is_zero() {
            return Ok(ValueAtRisk::zero());
        }

        let sigma = volatility / HUNDRED;
        let capped = |factor: Decimal| {
            portfolio_value
                .checked_mul(sigma)
                .and_then(|loss| loss.checked_mul(factor))
                .map_or(portfolio_value, |loss| loss.min(portfolio_value))
        };
        let pct_of = |loss: Decimal| (loss / portfolio_value * HUNDRED).round_dp(DECIMAL_PRECISION);
        // Density of the standard normal at z, divided by the tail mass beyond z.
        let tail_factor = |z: Decimal, tail: Decimal| {
            z.checked_norm_pdf().unwrap_or(Decimal::ZERO) / tail
        };

        let z95 = self.config.z_score_95;
        let z99 = self.config.z_score_99;
        let loss95 = capped(z95);
        let loss99 = capped(z99);
        let shortfall95 = capped(tail_factor(z95, TAIL_PROBABILITY_95));
        let shortfall99 = capped(tail_factor(z99, TAIL_PROBABILITY_99));

        Ok(ValueAtRisk {
            loss95,
            loss99,
            pct_of95: pct_of(loss95),
            pct_of99: pct_of(loss99),
            shortfall95,
            shortfall99,
        })
    }

    // =========================================================================
    // Correlation
    // =========================================================================

    /// Symmetric matrix of pairwise return correlations with a unit diagonal.
    pub fn correlation_matrix(&self, snapshot: &PortfolioSnapshot) -> CorrelationMatrix {
        let n = snapshot.len();
        if n == 0 {
            return CorrelationMatrix::default();
        }

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        let correlations: HashMap<(usize, usize), Decimal> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (xs, ys) = align_pair(
                    &snapshot.holdings[i].value_series,
                    &snapshot.holdings[j].value_series,
                );
                let correlation = match paired_returns(&xs, &ys) {
                    Some((rx, ry)) => pearson(&rx, &ry).round_dp(DECIMAL_PRECISION),
                    None => {
                        warn!(
                            "Returns of {} and {} overflow; correlation set to 0",
                            snapshot.holdings[i].id, snapshot.holdings[j].id
                        );
                        Decimal::ZERO
                    }
                };
                ((i, j), correlation)
            })
            .collect();

        let mut values = vec![vec![Decimal::ZERO; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = Decimal::ONE;
        }
        for ((i, j), correlation) in correlations {
            values[i][j] = correlation;
            values[j][i] = correlation;
        }

        CorrelationMatrix {
            holding_ids: snapshot.holdings.iter().map(|h| h.id.clone()).collect(),
            values,
        }
    }

    // =========================================================================
    // Composite score
    // =========================================================================

    /// Weighted blend of a volatility sub-score (saturating at the configured
    /// ceiling) and a concentration sub-score (`HHI * 100`), scaled 0..=100.
    ///
    /// A non-positive ceiling disables the volatility sub-score.
    pub fn risk_score(&self, volatility: Decimal, hhi: Option<Decimal>) -> (Decimal, RiskLevel) {
        let ceiling = self.config.volatility_ceiling_percent;
        let volatility_score = if ceiling > Decimal::ZERO {
            volatility
                .max(Decimal::ZERO)
                .checked_div(ceiling)
                .map_or(Decimal::ONE, |ratio| ratio.min(Decimal::ONE))
                * HUNDRED
        } else {
            Decimal::ZERO
        };
        let concentration_score = hhi.unwrap_or(Decimal::ZERO) * HUNDRED;

        let score = self.blend_scores(volatility_score, concentration_score);
        let score = score.clamp(Decimal::ZERO, HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION);

        (score, self.classify_score(score))
    }

    fn blend_scores(&self, volatility_score: Decimal, concentration_score: Decimal) -> Decimal {
        let volatility_weight = self.config.volatility_weight;
        let concentration_weight = self.config.concentration_weight;
        let blended = volatility_weight
            .checked_add(concentration_weight)
            .filter(|total| !total.is_zero())
            .and_then(|total| {
                let weighted = volatility_weight
                    .checked_mul(volatility_score)?
                    .checked_add(concentration_weight.checked_mul(concentration_score)?)?;
                weighted.checked_div(total)
            });

        blended.unwrap_or_else(|| {
            warn!(
                "Risk score weights {} and {} cannot be blended; score is 0",
                volatility_weight, concentration_weight
            );
            Decimal::ZERO
        })
    }

    fn classify_score(&self, score: Decimal) -> RiskLevel {
        if score <= self.config.low_risk_score_max {
            RiskLevel::Low
        } else if score <= self.config.medium_risk_score_max {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}
