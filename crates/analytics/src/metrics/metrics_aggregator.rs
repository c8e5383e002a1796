//! Composes the projection, risk and recommendation engines into report views.

use log::debug;
use rust_decimal::Decimal;

use crate::config::AnalyticsConfig;
use crate::constants::{DECIMAL_PRECISION, HUNDRED};
use crate::errors::Result;
use crate::portfolio::PortfolioSnapshot;
use crate::projection::{
    GoalSolveRequest, GoalSolveResult, ProjectionEngine, ProjectionRequest, ProjectionResult,
    ScenarioComparison, ScenarioRequest,
};
use crate::recommendations::{
    DerivedMetrics, Recommendation, RecommendationEngine, RecommendationKind, RuleContext,
};
use crate::risk::{RiskAnalyticsEngine, VolatilityTrend};

use super::{AdvancedMetrics, RiskReport};

const EMPTY_PORTFOLIO_SUMMARY: &str = "Add holdings to your portfolio to see a risk analysis.";
const BALANCED_SUMMARY: &str =
    "Your portfolio looks balanced. Keep reviewing it as your holdings change.";
const RISING_VOLATILITY_SUMMARY: &str =
    "Volatility has been rising recently. Review whether your risk exposure still matches your goals.";
const FALLING_VOLATILITY_SUMMARY: &str =
    "Volatility has been easing recently and your portfolio shows no major concentration issues.";

/// Stateless entry point for every analytics contract.
///
/// Each method is a pure function of its arguments and the configuration
/// supplied at construction, so one aggregator can serve concurrent callers.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    projection: ProjectionEngine,
    risk: RiskAnalyticsEngine,
    recommendations: RecommendationEngine,
}

impl MetricsAggregator {
    /// Validates `config` and builds engines with the default recommendation rules.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            projection: ProjectionEngine::new(config.projection),
            risk: RiskAnalyticsEngine::new(config.risk),
            recommendations: RecommendationEngine::with_default_rules(),
        })
    }

    /// Replaces the recommendation rule set.
    pub fn with_recommendations(mut self, recommendations: RecommendationEngine) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn projection(&self) -> &ProjectionEngine {
        &self.projection
    }

    pub fn risk(&self) -> &RiskAnalyticsEngine {
        &self.risk
    }

    pub fn recommendations(&self) -> &RecommendationEngine {
        &self.recommendations
    }

    // =========================================================================
    // Projection contracts
    // =========================================================================

    pub fn calculate_projection(&self, request: &ProjectionRequest) -> Result<ProjectionResult> {
        self.projection.simulate_growth(request)
    }

    pub fn compare_scenarios(&self, request: &ScenarioRequest) -> Result<ScenarioComparison> {
        self.projection.compare_scenarios(request)
    }

    pub fn solve_required_contribution(&self, request: &GoalSolveRequest) -> Result<GoalSolveResult> {
        self.projection.solve_required_contribution(request)
    }

    // =========================================================================
    // Portfolio contracts
    // =========================================================================

    /// Runs every risk statistic and recommendation rule over `snapshot`.
    ///
    /// An empty snapshot is a valid input and yields a zeroed report.
    pub fn portfolio_analysis(&self, snapshot: &PortfolioSnapshot) -> Result<RiskReport> {
        snapshot.validate()?;
        let config = self.risk.config();

        let total_value = snapshot.total_value();
        let total_invested = snapshot.total_invested();
        let hhi = self.risk.herfindahl_index(snapshot);
        let diversification_score = self.risk.diversification_index(snapshot);
        let risk_distribution = self.risk.risk_distribution(snapshot);
        let volatility = self.risk.volatility(snapshot);

        let mean_annual_return = if volatility.is_insufficient() {
            simple_return_percent(total_value, total_invested)
        } else {
            volatility.mean_annual_return
        };
        let sharpe_ratio = self.risk.sharpe_ratio(
            mean_annual_return,
            volatility.historical,
            config.risk_free_rate_percent,
        );
        let value_at_risk = self.risk.value_at_risk(total_value, volatility.historical)?;
        let correlation_matrix = self.risk.correlation_matrix(snapshot);
        let (risk_score, risk_level) = self.risk.risk_score(volatility.historical, hhi);

        let metrics = DerivedMetrics {
            total_value,
            diversification_score,
            risk_distribution,
            volatility,
        };
        let recommendations = self
            .recommendations
            .evaluate(&RuleContext::new(snapshot, &metrics, config));

        debug!(
            "Analyzed {} holdings: risk score {} ({}), {} recommendations",
            snapshot.len(),
            risk_score,
            risk_level,
            recommendations.len()
        );

        let DerivedMetrics {
            risk_distribution,
            volatility,
            ..
        } = metrics;

        Ok(RiskReport {
            total_value,
            total_invested,
            total_gain: total_value - total_invested,
            investment_count: snapshot.len(),
            risk_score,
            risk_level,
            diversification_score,
            risk_distribution,
            volatility,
            sharpe_ratio,
            value_at_risk,
            correlation_matrix,
            recommendations,
        })
    }

    /// [`portfolio_analysis`](Self::portfolio_analysis) plus sector breakdown,
    /// volatility trend and a summary sentence.
    pub fn advanced_metrics(&self, snapshot: &PortfolioSnapshot) -> Result<AdvancedMetrics> {
        let report = self.portfolio_analysis(snapshot)?;
        let sector_concentration = self.risk.sector_concentration(snapshot);
        let volatility_trend = self.risk.volatility_trend(snapshot);
        let recommendation = summarize(snapshot, &report.recommendations, volatility_trend);

        Ok(AdvancedMetrics {
            report,
            sector_concentration,
            volatility_trend,
            recommendation,
        })
    }
}

/// Gain over cost basis in percent; 0 when nothing was invested.
fn simple_return_percent(total_value: Decimal, total_invested: Decimal) -> Decimal {
    if total_invested <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (total_value - total_invested)
        .checked_div(total_invested)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .map_or(Decimal::ZERO, |percent| percent.round_dp(DECIMAL_PRECISION))
}

/// The dominant concern: first warning, then first info, then the volatility direction.
fn summarize(
    snapshot: &PortfolioSnapshot,
    recommendations: &[Recommendation],
    trend: VolatilityTrend,
) -> String {
    if snapshot.is_empty() {
        return EMPTY_PORTFOLIO_SUMMARY.to_string();
    }

    let dominant = recommendations
        .iter()
        .find(|r| r.is_warning())
        .or_else(|| {
            recommendations
                .iter()
                .find(|r| r.kind == RecommendationKind::Info)
        });
    if let Some(rec) = dominant {
        return rec.message.clone();
    }

    match trend {
        VolatilityTrend::Increasing => RISING_VOLATILITY_SUMMARY.to_string(),
        VolatilityTrend::Decreasing => FALLING_VOLATILITY_SUMMARY.to_string(),
        VolatilityTrend::Stable | VolatilityTrend::InsufficientData => BALANCED_SUMMARY.to_string(),
    }
}
