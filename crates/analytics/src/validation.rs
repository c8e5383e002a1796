//! Boundary checks applied before any formula runs.

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::MAX_AMOUNT;
use crate::errors::{Error, Result};

/// Converts a loosely-typed float into a `Decimal`, rejecting NaN and infinities.
pub fn decimal_from_f64(field: &str, value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::invalid_input(field, "must be a finite number"));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| Error::invalid_input(field, format!("{} is out of range", value)))
}

pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::invalid_input(
            field,
            format!("must not be negative (got {})", value),
        ));
    }
    Ok(())
}

/// Money amounts and series values: non-negative and at most `MAX_AMOUNT`.
pub fn ensure_amount(field: &str, value: Decimal) -> Result<()> {
    ensure_non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(Error::invalid_input(
            field,
            format!("must not exceed {} (got {})", MAX_AMOUNT, value),
        ));
    }
    Ok(())
}

pub fn ensure_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::invalid_input(
            field,
            format!("must be greater than zero (got {})", value),
        ));
    }
    Ok(())
}

/// Years must be at least one and no more than `max_years`.
pub fn ensure_years(field: &str, years: u32, max_years: u32) -> Result<()> {
    if years == 0 {
        return Err(Error::invalid_input(field, "must be greater than zero"));
    }
    if years > max_years {
        return Err(Error::invalid_input(
            field,
            format!("must not exceed {} years (got {})", max_years, years),
        ));
    }
    Ok(())
}

/// Percent rates below -100 have no meaning as growth (the base would turn negative).
pub fn ensure_rate_percent(field: &str, percent: Decimal) -> Result<()> {
    if percent < dec!(-100) {
        return Err(Error::invalid_input(
            field,
            format!("must not be below -100 (got {})", percent),
        ));
    }
    Ok(())
}
