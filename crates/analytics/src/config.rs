//! Engine configuration.
//!
//! Scenario rates, z-scores and recommendation thresholds live here rather than
//! in the formulas, so callers (and tests) can override any of them. Every
//! field has a default; a partial JSON document only overrides what it names.

use std::path::Path;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

// =============================================================================
// Top-level configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    pub projection: ProjectionConfig,
    pub risk: RiskConfig,
}

impl AnalyticsConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading analytics configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        self.risk.validate()
    }
}

// =============================================================================
// Projection
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionConfig {
    /// Annual return used for the conservative scenario (default: 6%)
    pub conservative_rate_percent: Decimal,

    /// Annual return used for the moderate scenario (default: 10%)
    pub moderate_rate_percent: Decimal,

    /// Annual return used for the aggressive scenario (default: 15%)
    pub aggressive_rate_percent: Decimal,

    /// Longest horizon accepted by the projection engine (default: 100)
    pub max_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            conservative_rate_percent: dec!(6),
            moderate_rate_percent: dec!(10),
            aggressive_rate_percent: dec!(15),
            max_years: 100,
        }
    }
}

impl ProjectionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.conservative_rate_percent <= self.moderate_rate_percent
            && self.moderate_rate_percent <= self.aggressive_rate_percent)
        {
            return Err(Error::InvalidConfigValue(
                "scenario rates must be ordered conservative <= moderate <= aggressive".into(),
            ));
        }
        if self.conservative_rate_percent <= dec!(-100) {
            return Err(Error::InvalidConfigValue(
                "scenario rates must be greater than -100".into(),
            ));
        }
        if self.max_years == 0 {
            return Err(Error::InvalidConfigValue("maxYears must be positive".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Risk
// =============================================================================

/// What a "share" means when measuring concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DiversificationBasis {
    /// Each holding is its own bucket.
    #[default]
    Holding,
    /// Holdings are pooled by category before squaring shares.
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskConfig {
    /// Risk-free rate subtracted in the Sharpe ratio, percent (default: 2)
    pub risk_free_rate_percent: Decimal,

    /// One-sided z-score at 95% confidence (default: 1.645)
    pub z_score_95: Decimal,

    /// One-sided z-score at 99% confidence (default: 2.326)
    pub z_score_99: Decimal,

    /// Category share above which a concentration warning fires, percent (default: 40)
    pub concentration_threshold_percent: Decimal,

    /// High-risk share above which a rebalancing warning fires, percent (default: 50)
    pub high_risk_threshold_percent: Decimal,

    /// Diversification score below which more holdings are suggested (default: 40)
    pub moderate_diversification_score: Decimal,

    /// Holding count below which more holdings are suggested (default: 5)
    pub min_holdings: usize,

    /// Annualized volatility above which a volatility note fires, percent (default: 30)
    pub high_volatility_percent: Decimal,

    pub diversification_basis: DiversificationBasis,

    /// Weight of the volatility sub-score in the risk score (default: 0.6)
    pub volatility_weight: Decimal,

    /// Weight of the concentration sub-score in the risk score (default: 0.4)
    pub concentration_weight: Decimal,

    /// Volatility at which the volatility sub-score saturates, percent (default: 40)
    pub volatility_ceiling_percent: Decimal,

    /// Highest risk score still classified as low (default: 35)
    pub low_risk_score_max: Decimal,

    /// Highest risk score still classified as medium (default: 65)
    pub medium_risk_score_max: Decimal,

    /// Number of returns per rolling volatility window (default: 20)
    pub trend_window: usize,

    /// Relative change between windows treated as noise, percent (default: 10)
    pub trend_tolerance_percent: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_percent: dec!(2),
            z_score_95: dec!(1.645),
            z_score_99: dec!(2.326),
            concentration_threshold_percent: dec!(40),
            high_risk_threshold_percent: dec!(50),
            moderate_diversification_score: dec!(40),
            min_holdings: 5,
            high_volatility_percent: dec!(30),
            diversification_basis: DiversificationBasis::Holding,
            volatility_weight: dec!(0.6),
            concentration_weight: dec!(0.4),
            volatility_ceiling_percent: dec!(40),
            low_risk_score_max: dec!(35),
            medium_risk_score_max: dec!(65),
            trend_window: 20,
            trend_tolerance_percent: dec!(10),
        }
    }
}

impl RiskConfig {
    fn validate(&self) -> Result<()> {
        if self.z_score_95 < Decimal::ZERO || self.z_score_99 < self.z_score_95 {
            return Err(Error::InvalidConfigValue(
                "z-scores must satisfy 0 <= zScore95 <= zScore99".into(),
            ));
        }
        if self.volatility_weight < Decimal::ZERO || self.concentration_weight < Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "risk score weights must not be negative".into(),
            ));
        }
        if (self.volatility_weight + self.concentration_weight).is_zero() {
            return Err(Error::InvalidConfigValue(
                "at least one risk score weight must be positive".into(),
            ));
        }
        if self.volatility_ceiling_percent <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "volatilityCeilingPercent must be positive".into(),
            ));
        }
        if self.low_risk_score_max > self.medium_risk_score_max {
            return Err(Error::InvalidConfigValue(
                "lowRiskScoreMax must not exceed mediumRiskScoreMax".into(),
            ));
        }
        if self.trend_window == 0 {
            return Err(Error::InvalidConfigValue("trendWindow must be positive".into()));
        }
        if self.trend_tolerance_percent < Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "trendTolerancePercent must not be negative".into(),
            ));
        }
        Ok(())
    }
}
