//! Fixture builders shared by unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::portfolio::{Holding, PortfolioSnapshot, RiskLevel, ValuePoint};

pub fn start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn holding(id: &str, category: &str, risk: RiskLevel, value: Decimal) -> Holding {
    Holding::new(id, category, risk, value, value)
}

/// Series with one point every `step_days`, starting at `start_date()`.
pub fn series(step_days: i64, values: &[Decimal]) -> Vec<ValuePoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ValuePoint::new(start_date() + Duration::days(step_days * i as i64), *v))
        .collect()
}

pub fn snapshot(holdings: Vec<Holding>) -> PortfolioSnapshot {
    PortfolioSnapshot::new(holdings, start_date() + Duration::days(365))
}

/// Asserts `actual` is within `tolerance` (relative to `expected`, absolute near zero).
pub fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    let scale = expected.abs().max(Decimal::ONE);
    assert!(
        diff <= tolerance * scale,
        "expected {} to be within {} of {} (diff {})",
        actual,
        tolerance,
        expected,
        diff
    );
}
