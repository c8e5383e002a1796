use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_YEAR, MONTHS_PER_YEAR};
use crate::errors::Result;
use crate::validation::decimal_from_f64;

/// How often growth is applied within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Daily,
    #[default]
    Monthly,
    Annual,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Daily => DAYS_PER_YEAR,
            CompoundingFrequency::Monthly => MONTHS_PER_YEAR,
            CompoundingFrequency::Annual => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    pub initial_amount: Decimal,
    /// Monthly contribution; rescaled when compounding is not monthly.
    pub periodic_contribution: Decimal,
    pub annual_return_percent: Decimal,
    pub years: u32,
    #[serde(default)]
    pub compounding_frequency: CompoundingFrequency,
    /// Optional annual inflation used to report real (today's money) balances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate_percent: Option<Decimal>,
}

impl ProjectionRequest {
    pub fn monthly(
        initial_amount: Decimal,
        periodic_contribution: Decimal,
        annual_return_percent: Decimal,
        years: u32,
    ) -> Self {
        Self {
            initial_amount,
            periodic_contribution,
            annual_return_percent,
            years,
            compounding_frequency: CompoundingFrequency::Monthly,
            inflation_rate_percent: None,
        }
    }

    /// Monthly plan from float inputs; NaN and infinities are rejected by field name.
    pub fn monthly_from_f64(
        initial_amount: f64,
        periodic_contribution: f64,
        annual_return_percent: f64,
        years: u32,
    ) -> Result<Self> {
        Ok(Self::monthly(
            decimal_from_f64("initialAmount", initial_amount)?,
            decimal_from_f64("periodicContribution", periodic_contribution)?,
            decimal_from_f64("annualReturnPercent", annual_return_percent)?,
            years,
        ))
    }
}

/// Balance at the end of one projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCheckpoint {
    pub year: u32,
    pub balance: Decimal,
    /// Cumulative contributions including the initial amount.
    pub contributions: Decimal,
    pub earnings: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_balance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub final_amount: Decimal,
    pub total_contributions: Decimal,
    pub total_earnings: Decimal,
    pub roi_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_adjusted_final_amount: Option<Decimal>,
    pub yearly_projection: Vec<YearlyCheckpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    pub initial_amount: Decimal,
    pub monthly_contribution: Decimal,
    pub years: u32,
}

impl ScenarioRequest {
    pub fn from_f64(initial_amount: f64, monthly_contribution: f64, years: u32) -> Result<Self> {
        Ok(Self {
            initial_amount: decimal_from_f64("initialAmount", initial_amount)?,
            monthly_contribution: decimal_from_f64("monthlyContribution", monthly_contribution)?,
            years,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub annual_return_percent: Decimal,
    pub final_amount: Decimal,
    pub total_earnings: Decimal,
    pub roi_percent: Decimal,
}

impl ScenarioSummary {
    pub(crate) fn from_result(annual_return_percent: Decimal, result: &ProjectionResult) -> Self {
        Self {
            annual_return_percent,
            final_amount: result.final_amount,
            total_earnings: result.total_earnings,
            roi_percent: result.roi_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub conservative: ScenarioSummary,
    pub moderate: ScenarioSummary,
    pub aggressive: ScenarioSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveRequest {
    pub target_amount: Decimal,
    pub initial_amount: Decimal,
    pub annual_return_percent: Decimal,
    pub years: u32,
}

impl GoalSolveRequest {
    pub fn from_f64(
        target_amount: f64,
        initial_amount: f64,
        annual_return_percent: f64,
        years: u32,
    ) -> Result<Self> {
        Ok(Self {
            target_amount: decimal_from_f64("targetAmount", target_amount)?,
            initial_amount: decimal_from_f64("initialAmount", initial_amount)?,
            annual_return_percent: decimal_from_f64("annualReturnPercent", annual_return_percent)?,
            years,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    /// Monthly contribution needed to reach the target.
    pub required_periodic_contribution: Decimal,
    /// Initial amount plus every monthly contribution.
    pub total_to_contribute: Decimal,
    pub yearly_projection: Vec<YearlyCheckpoint>,
}
