//! Series alignment and sample statistics on `Decimal` values.
//!
//! Every function here resolves undefined results (too few points, zero
//! variance, zero denominators) to zero instead of failing. Results that do
//! not fit in a `Decimal` come back as `None`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::portfolio::ValuePoint;

use super::SeriesFrequency;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Sums several value series over the timestamps present in all of them.
///
/// Empty series are ignored; the result is in ascending timestamp order.
pub fn aggregate_common_timestamps(series: &[&[ValuePoint]]) -> Vec<ValuePoint> {
    let populated: Vec<&[ValuePoint]> = series.iter().copied().filter(|s| !s.is_empty()).collect();
    if populated.is_empty() {
        return Vec::new();
    }

    let mut totals: BTreeMap<DateTime<Utc>, (Decimal, usize)> = BTreeMap::new();
    for points in &populated {
        for point in points.iter() {
            let entry = totals.entry(point.timestamp).or_insert((Decimal::ZERO, 0));
            entry.0 += point.value;
            entry.1 += 1;
        }
    }

    let required = populated.len();
    let aligned: Vec<ValuePoint> = totals
        .into_iter()
        .filter(|(_, (_, count))| *count == required)
        .map(|(timestamp, (value, _))| ValuePoint::new(timestamp, value))
        .collect();

    debug!(
        "Aligned {} series on {} common timestamps",
        required,
        aligned.len()
    );
    aligned
}

/// Values of two ascending series at the timestamps they share.
pub fn align_pair(a: &[ValuePoint], b: &[ValuePoint]) -> (Vec<Decimal>, Vec<Decimal>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].timestamp.cmp(&b[j].timestamp) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(a[i].value);
                ys.push(b[j].value);
                i += 1;
                j += 1;
            }
        }
    }

    (xs, ys)
}

/// Period-over-period fractional returns; intervals starting at zero are skipped.
///
/// `None` when any return overflows.
pub fn period_returns(values: &[Decimal]) -> Option<Vec<Decimal>> {
    values
        .windows(2)
        .filter(|w| !w[0].is_zero())
        .map(|w| w[1].checked_sub(w[0])?.checked_div(w[0]))
        .collect()
}

/// Returns of two aligned value sequences over the same intervals.
///
/// An interval is dropped from both sides when either starts at zero, so the
/// outputs stay index-aligned.
pub fn paired_returns(xs: &[Decimal], ys: &[Decimal]) -> Option<(Vec<Decimal>, Vec<Decimal>)> {
    let len = xs.len().min(ys.len());
    let mut rx = Vec::with_capacity(len.saturating_sub(1));
    let mut ry = Vec::with_capacity(len.saturating_sub(1));

    for k in 1..len {
        if xs[k - 1].is_zero() || ys[k - 1].is_zero() {
            continue;
        }
        rx.push(xs[k].checked_sub(xs[k - 1])?.checked_div(xs[k - 1])?);
        ry.push(ys[k].checked_sub(ys[k - 1])?.checked_div(ys[k - 1])?);
    }

    Some((rx, ry))
}

/// Arithmetic mean; `None` when empty or when the sum overflows.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len()))
}

/// Largest absolute value, or zero for an empty slice.
fn magnitude(values: &[Decimal]) -> Decimal {
    values.iter().map(|v| v.abs()).max().unwrap_or(Decimal::ZERO)
}

/// Divides every value by `scale` so all of them fall within [-1, 1].
fn normalized(values: &[Decimal], scale: Decimal) -> Vec<Decimal> {
    values.iter().map(|v| v / scale).collect()
}

/// Sample (n - 1) standard deviation; zero with fewer than two values.
///
/// Works on values scaled into [-1, 1] so squaring cannot overflow; `None`
/// only when the rescaled result itself does not fit.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return Some(Decimal::ZERO);
    }
    let scale = magnitude(values);
    if scale.is_zero() {
        return Some(Decimal::ZERO);
    }

    let scaled = normalized(values, scale);
    let mean = mean(&scaled)?;
    let sum_squared_diff: Decimal = scaled
        .iter()
        .map(|&v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();

    let variance = sum_squared_diff / Decimal::from(values.len() - 1);
    if variance.is_sign_negative() {
        return Some(Decimal::ZERO);
    }

    variance.sqrt().unwrap_or(Decimal::ZERO).checked_mul(scale)
}

/// Pearson correlation clamped to [-1, 1]; zero when either side has no variance.
pub fn pearson(xs: &[Decimal], ys: &[Decimal]) -> Decimal {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Decimal::ZERO;
    }
    // Correlation is scale-invariant; normalizing keeps the products small.
    let (scale_x, scale_y) = (magnitude(&xs[..n]), magnitude(&ys[..n]));
    if scale_x.is_zero() || scale_y.is_zero() {
        return Decimal::ZERO;
    }
    let xs = normalized(&xs[..n], scale_x);
    let ys = normalized(&ys[..n], scale_y);

    let mean_x = mean(&xs).unwrap_or(Decimal::ZERO);
    let mean_y = mean(&ys).unwrap_or(Decimal::ZERO);

    let mut covariance = Decimal::ZERO;
    let mut variance_x = Decimal::ZERO;
    let mut variance_y = Decimal::ZERO;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x.is_zero() || variance_y.is_zero() {
        return Decimal::ZERO;
    }

    let denominator = match (variance_x.sqrt(), variance_y.sqrt()) {
        (Some(sx), Some(sy)) => sx * sy,
        _ => return Decimal::ZERO,
    };
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    (covariance / denominator).clamp(Decimal::NEGATIVE_ONE, Decimal::ONE)
}

/// Largest peak-to-trough decline (as a fraction) of a non-negative value series.
pub fn max_drawdown(values: &[Decimal]) -> Decimal {
    let mut peak_value = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;

    for &value in values {
        peak_value = peak_value.max(value);
        if peak_value > Decimal::ZERO {
            // 0 <= value <= peak keeps the ratio within [0, 1].
            let drawdown = (peak_value - value) / peak_value;
            max_drawdown = max_drawdown.max(drawdown);
        }
    }

    max_drawdown
}

/// Infers the native frequency from the median gap between observations.
pub fn infer_frequency(points: &[ValuePoint]) -> Option<SeriesFrequency> {
    if points.len() < 2 {
        return None;
    }

    let mut gaps: Vec<i64> = points
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_seconds())
        .collect();
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2];

    Some(SeriesFrequency::from_gap_days(
        median as f64 / SECONDS_PER_DAY,
    ))
}
