use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for reported percentages and statistics
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

pub const MONTHS_PER_YEAR: u32 = 12;

pub const DAYS_PER_YEAR: u32 = 365;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;

pub const WEEKS_PER_YEAR: u32 = 52;

pub const QUARTERS_PER_YEAR: u32 = 4;

pub const HUNDRED: Decimal = dec!(100);

/// Largest accepted amount or series value. Sums over many holdings stay
/// well inside the `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(100000000000000000000);

/// Tail probabilities matching the 95% and 99% confidence levels.
pub const TAIL_PROBABILITY_95: Decimal = dec!(0.05);
pub const TAIL_PROBABILITY_99: Decimal = dec!(0.01);

/// Minimum number of period returns needed to compare two volatility windows.
pub const MIN_TREND_RETURNS: usize = 4;
