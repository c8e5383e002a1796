use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::risk::{RiskDistribution, VolatilityReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Warning,
    Info,
}

/// A single piece of advice produced by a recommendation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Identifier of the rule that produced this recommendation.
    pub rule: String,
    pub kind: RecommendationKind,
    pub title: String,
    pub message: String,
}

impl Recommendation {
    pub fn warning(rule: &str, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            kind: RecommendationKind::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(rule: &str, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            kind: RecommendationKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind == RecommendationKind::Warning
    }
}

/// Metrics already computed for a snapshot that rules may inspect.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub total_value: Decimal,
    pub diversification_score: Decimal,
    pub risk_distribution: RiskDistribution,
    pub volatility: VolatilityReport,
}
