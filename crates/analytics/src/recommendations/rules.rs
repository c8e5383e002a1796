//! Built-in recommendation rules, in their default evaluation order.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::{DISPLAY_DECIMAL_PRECISION, HUNDRED};

use super::{Recommendation, RecommendationRule, RuleContext};

fn display_percent(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMAL_PRECISION).normalize()
}

// =============================================================================
// Category concentration
// =============================================================================

/// Warns when the largest category holds more than the concentration threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryConcentrationRule;

impl RecommendationRule for CategoryConcentrationRule {
    fn id(&self) -> &'static str {
        "category_concentration"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let total = ctx.metrics.total_value;
        if total <= Decimal::ZERO {
            return None;
        }

        // Categories come back largest first.
        let (category, value, _) = ctx.snapshot.category_values().into_iter().next()?;
        let share = value / total * HUNDRED;
        if share <= ctx.config.concentration_threshold_percent {
            return None;
        }

        debug!("{}: {} holds {}% of value", self.id(), category, share);
        Some(Recommendation::warning(
            self.id(),
            format!("High concentration in {}", category),
            format!(
                "{} makes up {}% of your portfolio, above the {}% guideline. Consider spreading new money across other categories.",
                category,
                display_percent(share),
                display_percent(ctx.config.concentration_threshold_percent)
            ),
        ))
    }
}

// =============================================================================
// High-risk exposure
// =============================================================================

/// Warns when high-risk holdings exceed the configured share of value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighRiskExposureRule;

impl RecommendationRule for HighRiskExposureRule {
    fn id(&self) -> &'static str {
        "high_risk_exposure"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let high = ctx.metrics.risk_distribution.high.percentage;
        if high <= ctx.config.high_risk_threshold_percent {
            return None;
        }

        Some(Recommendation::warning(
            self.id(),
            "High exposure to risky holdings",
            format!(
                "{}% of your portfolio is in high-risk holdings. Consider rebalancing toward lower-risk investments.",
                display_percent(high)
            ),
        ))
    }
}

// =============================================================================
// Low diversification
// =============================================================================

/// Suggests more holdings when both the score and the holding count are low.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowDiversificationRule;

impl RecommendationRule for LowDiversificationRule {
    fn id(&self) -> &'static str {
        "low_diversification"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let count = ctx.snapshot.len();
        if count == 0 || count >= ctx.config.min_holdings {
            return None;
        }
        let score = ctx.metrics.diversification_score;
        if score >= ctx.config.moderate_diversification_score {
            return None;
        }

        let holdings = if count == 1 { "holding" } else { "holdings" };
        Some(Recommendation::info(
            self.id(),
            "Add more holdings",
            format!(
                "Your portfolio has {} {} and a diversification score of {}. Adding more distinct investments would reduce the impact of any single one.",
                count,
                holdings,
                display_percent(score)
            ),
        ))
    }
}

// =============================================================================
// High volatility
// =============================================================================

/// Notes when historical volatility is above the configured level.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighVolatilityRule;

impl RecommendationRule for HighVolatilityRule {
    fn id(&self) -> &'static str {
        "high_volatility"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        let volatility = &ctx.metrics.volatility;
        if volatility.is_insufficient() || volatility.historical <= ctx.config.high_volatility_percent
        {
            return None;
        }

        Some(Recommendation::info(
            self.id(),
            "Portfolio value swings widely",
            format!(
                "Annualized volatility is {}%. Expect large short-term moves, or add steadier holdings to smooth them.",
                display_percent(volatility.historical)
            ),
        ))
    }
}
