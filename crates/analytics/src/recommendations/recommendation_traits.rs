use crate::config::RiskConfig;
use crate::portfolio::PortfolioSnapshot;

use super::{DerivedMetrics, Recommendation};

/// Everything a rule may look at: the snapshot, its derived metrics and thresholds.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub snapshot: &'a PortfolioSnapshot,
    pub metrics: &'a DerivedMetrics,
    pub config: &'a RiskConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        snapshot: &'a PortfolioSnapshot,
        metrics: &'a DerivedMetrics,
        config: &'a RiskConfig,
    ) -> Self {
        Self {
            snapshot,
            metrics,
            config,
        }
    }
}

/// An independent recommendation evaluator.
///
/// Rules must be pure: the same context always yields the same result, and
/// a rule never depends on what other rules returned.
pub trait RecommendationRule: Send + Sync {
    /// Stable identifier, copied into every recommendation the rule emits.
    fn id(&self) -> &'static str;

    /// Returns a recommendation when the rule's condition holds.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation>;
}
