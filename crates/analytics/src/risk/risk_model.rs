use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MONTHS_PER_YEAR, QUARTERS_PER_YEAR, TRADING_DAYS_PER_YEAR, WEEKS_PER_YEAR};
use crate::portfolio::RiskLevel;

/// Native spacing of a value series, inferred from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl SeriesFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            SeriesFrequency::Daily => TRADING_DAYS_PER_YEAR,
            SeriesFrequency::Weekly => WEEKS_PER_YEAR,
            SeriesFrequency::Monthly => MONTHS_PER_YEAR,
            SeriesFrequency::Quarterly => QUARTERS_PER_YEAR,
            SeriesFrequency::Annual => 1,
        }
    }

    /// Maps a typical gap between observations (in days) to a frequency.
    pub fn from_gap_days(days: f64) -> Self {
        if days <= 4.0 {
            SeriesFrequency::Daily
        } else if days <= 10.0 {
            SeriesFrequency::Weekly
        } else if days <= 45.0 {
            SeriesFrequency::Monthly
        } else if days <= 120.0 {
            SeriesFrequency::Quarterly
        } else {
            SeriesFrequency::Annual
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityReport {
    /// Annualized sample standard deviation of period returns, percent.
    pub historical: Decimal,
    /// Number of aligned portfolio observations the statistic was computed from.
    pub data_points: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<SeriesFrequency>,
    /// Arithmetic mean period return scaled to a year, percent.
    pub mean_annual_return: Decimal,
    /// Largest peak-to-trough decline, percent.
    pub max_drawdown: Decimal,
}

impl VolatilityReport {
    pub fn insufficient(data_points: usize) -> Self {
        Self {
            historical: Decimal::ZERO,
            data_points,
            frequency: None,
            mean_annual_return: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        }
    }

    /// True when there were not enough returns to estimate dispersion.
    pub fn is_insufficient(&self) -> bool {
        self.frequency.is_none()
    }
}

/// Parametric value-at-risk over the volatility's horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAtRisk {
    pub loss95: Decimal,
    pub loss99: Decimal,
    pub pct_of95: Decimal,
    pub pct_of99: Decimal,
    /// Expected loss given the 95% threshold is breached.
    pub shortfall95: Decimal,
    /// Expected loss given the 99% threshold is breached.
    pub shortfall99: Decimal,
}

impl ValueAtRisk {
    pub fn zero() -> Self {
        Self {
            loss95: Decimal::ZERO,
            loss99: Decimal::ZERO,
            pct_of95: Decimal::ZERO,
            pct_of99: Decimal::ZERO,
            shortfall95: Decimal::ZERO,
            shortfall99: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskBucket {
    pub count: usize,
    pub value: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub low: RiskBucket,
    pub medium: RiskBucket,
    pub high: RiskBucket,
}

impl RiskDistribution {
    pub fn bucket(&self, level: RiskLevel) -> &RiskBucket {
        match level {
            RiskLevel::Low => &self.low,
            RiskLevel::Medium => &self.medium,
            RiskLevel::High => &self.high,
        }
    }

    pub(crate) fn bucket_mut(&mut self, level: RiskLevel) -> &mut RiskBucket {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::High => &mut self.high,
        }
    }

    pub fn total_percentage(&self) -> Decimal {
        self.low.percentage + self.medium.percentage + self.high.percentage
    }
}

/// Pearson correlations of holdings' returns, indexed like `holding_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub holding_ids: Vec<String>,
    pub values: Vec<Vec<Decimal>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Decimal> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Direction of the latest rolling volatility window relative to the one before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolatilityTrend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorConcentration {
    pub sector: String,
    pub value: Decimal,
    pub percentage: Decimal,
    pub holding_count: usize,
}
