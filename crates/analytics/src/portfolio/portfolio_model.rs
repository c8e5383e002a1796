//! Holdings snapshot domain models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::validation::ensure_amount;

/// Risk classification attached to each holding by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single observation of a holding's market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

impl ValuePoint {
    pub fn new(timestamp: DateTime<Utc>, value: Decimal) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub amount_invested: Decimal,
    pub current_value: Decimal,
    pub risk_level: RiskLevel,
    pub category: String,
    #[serde(default)]
    pub value_series: Vec<ValuePoint>,
}

impl Holding {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        risk_level: RiskLevel,
        amount_invested: Decimal,
        current_value: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            amount_invested,
            current_value,
            risk_level,
            category: category.into(),
            value_series: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Vec<ValuePoint>) -> Self {
        self.value_series = series;
        self
    }

    /// Checks amounts and series ordering; `index` names the holding in errors.
    fn validate(&self, index: usize) -> Result<()> {
        ensure_amount(
            &format!("holdings[{}].amountInvested", index),
            self.amount_invested,
        )?;
        ensure_amount(
            &format!("holdings[{}].currentValue", index),
            self.current_value,
        )?;

        for (pos, point) in self.value_series.iter().enumerate() {
            ensure_amount(
                &format!("holdings[{}].valueSeries[{}].value", index, pos),
                point.value,
            )?;
        }

        if let Some(pos) = self
            .value_series
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(Error::invalid_input(
                format!("holdings[{}].valueSeries", index),
                format!(
                    "timestamps must be strictly ascending (entry {} at {} follows {})",
                    pos + 1,
                    self.value_series[pos + 1].timestamp,
                    self.value_series[pos].timestamp
                ),
            ));
        }

        Ok(())
    }
}

/// Point-in-time view of a portfolio, supplied by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    pub as_of: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn new(holdings: Vec<Holding>, as_of: DateTime<Utc>) -> Self {
        Self { holdings, as_of }
    }

    pub fn empty(as_of: DateTime<Utc>) -> Self {
        Self::new(Vec::new(), as_of)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn total_value(&self) -> Decimal {
        self.holdings.iter().map(|h| h.current_value).sum()
    }

    pub fn total_invested(&self) -> Decimal {
        self.holdings.iter().map(|h| h.amount_invested).sum()
    }

    /// Current value per category, sorted by value descending then name.
    pub fn category_values(&self) -> Vec<(String, Decimal, usize)> {
        let mut by_category: HashMap<&str, (Decimal, usize)> = HashMap::new();
        for holding in &self.holdings {
            let entry = by_category
                .entry(holding.category.as_str())
                .or_insert((Decimal::ZERO, 0));
            entry.0 += holding.current_value;
            entry.1 += 1;
        }

        let mut values: Vec<(String, Decimal, usize)> = by_category
            .into_iter()
            .map(|(category, (value, count))| (category.to_string(), value, count))
            .collect();
        values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        values
    }

    /// Rejects negative amounts and unordered or duplicated series timestamps.
    pub fn validate(&self) -> Result<()> {
        for (index, holding) in self.holdings.iter().enumerate() {
            holding.validate(index)?;
        }
        Ok(())
    }
}
