use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::RiskLevel;
use crate::recommendations::Recommendation;
use crate::risk::{
    CorrelationMatrix, RiskDistribution, SectorConcentration, ValueAtRisk, VolatilityReport,
    VolatilityTrend,
};

/// Full risk analysis of one portfolio snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub total_value: Decimal,
    pub total_invested: Decimal,
    /// `total_value - total_invested`.
    pub total_gain: Decimal,
    pub investment_count: usize,
    /// Composite 0..=100 score; higher means riskier.
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
    pub diversification_score: Decimal,
    pub risk_distribution: RiskDistribution,
    pub volatility: VolatilityReport,
    pub sharpe_ratio: Decimal,
    pub value_at_risk: ValueAtRisk,
    pub correlation_matrix: CorrelationMatrix,
    pub recommendations: Vec<Recommendation>,
}

/// [`RiskReport`] plus sector breakdown, volatility direction and a one-line summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMetrics {
    #[serde(flatten)]
    pub report: RiskReport,
    pub sector_concentration: Vec<SectorConcentration>,
    pub volatility_trend: VolatilityTrend,
    pub recommendation: String,
}
