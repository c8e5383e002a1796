//! Compound-growth simulation, scenario comparison and goal solving.

use std::iter::FusedIterator;

use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::config::ProjectionConfig;
use crate::constants::{DECIMAL_PRECISION, HUNDRED, MONTHS_PER_YEAR};
use crate::errors::{CalculatorError, Error, Result};
use crate::validation::{ensure_non_negative, ensure_positive, ensure_rate_percent, ensure_years};

use super::{
    CompoundingFrequency, GoalSolveRequest, GoalSolveResult, ProjectionRequest, ProjectionResult,
    ScenarioComparison, ScenarioRequest, ScenarioSummary, YearlyCheckpoint,
};

/// Largest balance magnitude the simulation will attempt (Decimal tops out near 7.9e28).
const MAX_REPRESENTABLE_BALANCE: f64 = 1e26;

/// Converts an annual percent return into the equivalent per-period rate,
/// `(1 + annual/100)^(1/periods) - 1`.
pub fn periodic_rate(annual_return_percent: Decimal, periods_per_year: u32) -> Result<Decimal> {
    if annual_return_percent.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let annual = annual_return_percent / HUNDRED;
    if periods_per_year <= 1 {
        return Ok(annual);
    }

    let base = Decimal::ONE + annual;
    if base.is_zero() {
        // A -100% year wipes the balance out in its first period.
        return Ok(Decimal::NEGATIVE_ONE);
    }

    let exponent = Decimal::ONE / Decimal::from(periods_per_year);
    base.checked_powd(exponent)
        .map(|growth| growth - Decimal::ONE)
        .ok_or_else(|| {
            Error::Calculation(CalculatorError::Overflow(format!(
                "periodic rate for {}% over {} periods",
                annual_return_percent, periods_per_year
            )))
        })
}

/// A fully-resolved growth schedule: per-period rate and contribution.
///
/// The plan owns no results; every call to [`GrowthPlan::checkpoints`]
/// replays the schedule from the initial amount.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPlan {
    initial_amount: Decimal,
    contribution_per_period: Decimal,
    annual_contribution: Decimal,
    rate_per_period: Decimal,
    periods_per_year: u32,
    years: u32,
    inflation_rate: Option<Decimal>,
}

impl GrowthPlan {
    fn new(
        initial_amount: Decimal,
        monthly_contribution: Decimal,
        rate_per_period: Decimal,
        frequency: CompoundingFrequency,
        years: u32,
        inflation_rate_percent: Option<Decimal>,
    ) -> Self {
        let periods_per_year = frequency.periods_per_year();
        let annual_contribution = monthly_contribution * Decimal::from(MONTHS_PER_YEAR);
        let contribution_per_period = if frequency == CompoundingFrequency::Monthly {
            monthly_contribution
        } else {
            annual_contribution / Decimal::from(periods_per_year)
        };

        Self {
            initial_amount,
            contribution_per_period,
            annual_contribution,
            rate_per_period,
            periods_per_year,
            years,
            inflation_rate: inflation_rate_percent.map(|p| p / HUNDRED),
        }
    }

    pub fn rate_per_period(&self) -> Decimal {
        self.rate_per_period
    }

    pub fn contribution_per_period(&self) -> Decimal {
        self.contribution_per_period
    }

    pub fn total_periods(&self) -> u64 {
        u64::from(self.years) * u64::from(self.periods_per_year)
    }

    /// Initial amount plus every contribution over the whole horizon.
    pub fn total_contributions(&self) -> Decimal {
        self.contributions_after(self.years)
    }

    fn contributions_after(&self, years: u32) -> Decimal {
        self.initial_amount + self.annual_contribution * Decimal::from(years)
    }

    /// Lazily replays the schedule, yielding one checkpoint per completed year.
    pub fn checkpoints(&self) -> YearlyCheckpoints<'_> {
        YearlyCheckpoints {
            plan: self,
            balance: self.initial_amount,
            year: 0,
            inflation_factor: Decimal::ONE,
        }
    }

    /// Rough float estimate of the final balance, used to refuse horizons
    /// that would overflow decimal arithmetic.
    fn ensure_representable(&self, annual_return_percent: Decimal) -> Result<()> {
        let rate = annual_return_percent.to_f64().unwrap_or(0.0) / 100.0;
        let growth = (1.0 + rate).max(1.0).powf(f64::from(self.years));
        let principal = self.total_contributions().to_f64().unwrap_or(f64::INFINITY);
        let estimate = principal * growth;
        if !estimate.is_finite() || estimate > MAX_REPRESENTABLE_BALANCE {
            return Err(Error::Calculation(CalculatorError::Overflow(format!(
                "projected balance over {} years at {}%",
                self.years, annual_return_percent
            ))));
        }
        Ok(())
    }
}

/// Iterator over yearly checkpoints of a [`GrowthPlan`].
#[derive(Debug, Clone)]
pub struct YearlyCheckpoints<'a> {
    plan: &'a GrowthPlan,
    balance: Decimal,
    year: u32,
    inflation_factor: Decimal,
}

impl Iterator for YearlyCheckpoints<'_> {
    type Item = YearlyCheckpoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.year >= self.plan.years {
            return None;
        }

        let growth = Decimal::ONE + self.plan.rate_per_period;
        for _ in 0..self.plan.periods_per_year {
            self.balance = self.balance * growth + self.plan.contribution_per_period;
        }
        self.year += 1;

        let real_balance = self.plan.inflation_rate.and_then(|inflation| {
            self.inflation_factor *= Decimal::ONE + inflation;
            self.balance.checked_div(self.inflation_factor)
        });
        let contributions = self.plan.contributions_after(self.year);

        Some(YearlyCheckpoint {
            year: self.year,
            balance: self.balance,
            contributions,
            earnings: self.balance - contributions,
            real_balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.years.saturating_sub(self.year) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for YearlyCheckpoints<'_> {}

impl FusedIterator for YearlyCheckpoints<'_> {}

/// Deterministic time-value-of-money calculations.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Validates a request and resolves it into a replayable growth schedule.
    pub fn plan(&self, request: &ProjectionRequest) -> Result<GrowthPlan> {
        ensure_non_negative("initialAmount", request.initial_amount)?;
        ensure_non_negative("periodicContribution", request.periodic_contribution)?;
        ensure_rate_percent("annualReturnPercent", request.annual_return_percent)?;
        ensure_years("years", request.years, self.config.max_years)?;
        if let Some(inflation) = request.inflation_rate_percent {
            ensure_rate_percent("inflationRatePercent", inflation)?;
            let compounded = (1.0 + inflation.to_f64().unwrap_or(0.0) / 100.0)
                .powf(f64::from(request.years));
            if !(1e-12..=1e12).contains(&compounded) {
                return Err(Error::invalid_input(
                    "inflationRatePercent",
                    format!(
                        "{}% compounded over {} years is outside the supported range",
                        inflation, request.years
                    ),
                ));
            }
        }

        let frequency = request.compounding_frequency;
        let rate = periodic_rate(request.annual_return_percent, frequency.periods_per_year())?;
        let plan = GrowthPlan::new(
            request.initial_amount,
            request.periodic_contribution,
            rate,
            frequency,
            request.years,
            request.inflation_rate_percent,
        );
        plan.ensure_representable(request.annual_return_percent)?;
        Ok(plan)
    }

    /// Projects the future value of a savings plan under compound growth.
    pub fn simulate_growth(&self, request: &ProjectionRequest) -> Result<ProjectionResult> {
        let plan = self.plan(request)?;
        debug!(
            "Simulating {} periods at {} per period ({:?} compounding)",
            plan.total_periods(),
            plan.rate_per_period(),
            request.compounding_frequency
        );

        let yearly_projection: Vec<YearlyCheckpoint> = plan.checkpoints().collect();
        let final_checkpoint = yearly_projection.last();
        let final_amount = final_checkpoint
            .map(|c| c.balance)
            .unwrap_or(request.initial_amount);
        let inflation_adjusted_final_amount = final_checkpoint.and_then(|c| c.real_balance);

        let total_contributions = plan.total_contributions();
        let total_earnings = final_amount - total_contributions;
        let roi_percent = if total_contributions.is_zero() {
            Decimal::ZERO
        } else {
            (total_earnings / total_contributions * HUNDRED).round_dp(DECIMAL_PRECISION)
        };

        Ok(ProjectionResult {
            final_amount,
            total_contributions,
            total_earnings,
            roi_percent,
            inflation_adjusted_final_amount,
            yearly_projection,
        })
    }

    /// Runs the same plan at the configured conservative, moderate and aggressive rates.
    pub fn compare_scenarios(&self, request: &ScenarioRequest) -> Result<ScenarioComparison> {
        let run = |rate: Decimal| -> Result<ScenarioSummary> {
            let result = self.simulate_growth(&ProjectionRequest::monthly(
                request.initial_amount,
                request.monthly_contribution,
                rate,
                request.years,
            ))?;
            Ok(ScenarioSummary::from_result(rate, &result))
        };

        Ok(ScenarioComparison {
            conservative: run(self.config.conservative_rate_percent)?,
            moderate: run(self.config.moderate_rate_percent)?,
            aggressive: run(self.config.aggressive_rate_percent)?,
        })
    }

    /// Solves the future-value-of-annuity formula for the monthly contribution
    /// that reaches `target_amount` after `years`.
    pub fn solve_required_contribution(&self, request: &GoalSolveRequest) -> Result<GoalSolveResult> {
        ensure_positive("targetAmount", request.target_amount)?;
        ensure_non_negative("initialAmount", request.initial_amount)?;
        ensure_rate_percent("annualReturnPercent", request.annual_return_percent)?;
        ensure_years("years", request.years, self.config.max_years)?;

        let periods = u64::from(request.years) * u64::from(MONTHS_PER_YEAR);
        let rate = periodic_rate(request.annual_return_percent, MONTHS_PER_YEAR)?;
        let growth = (Decimal::ONE + rate).checked_powu(periods).ok_or_else(|| {
            Error::Calculation(CalculatorError::Overflow(format!(
                "growth factor over {} periods",
                periods
            )))
        })?;

        let lump_sum_value = request
            .initial_amount
            .checked_mul(growth)
            .ok_or_else(|| Error::Calculation(CalculatorError::Overflow("lump sum value".into())))?;
        let shortfall = request.target_amount - lump_sum_value;
        let annuity_factor = growth - Decimal::ONE;

        let required = if shortfall <= Decimal::ZERO {
            debug!(
                "Initial amount alone reaches {} (target {})",
                lump_sum_value, request.target_amount
            );
            Decimal::ZERO
        } else if rate.is_zero() || annuity_factor.is_zero() {
            shortfall / Decimal::from(periods)
        } else {
            shortfall * rate / annuity_factor
        };
        let required = required.max(Decimal::ZERO);

        let plan = self.plan(&ProjectionRequest::monthly(
            request.initial_amount,
            required,
            request.annual_return_percent,
            request.years,
        ))?;

        Ok(GoalSolveResult {
            required_periodic_contribution: required,
            total_to_contribute: request.initial_amount + required * Decimal::from(periods),
            yearly_projection: plan.checkpoints().collect(),
        })
    }
}
