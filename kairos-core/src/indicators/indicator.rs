//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! series is aligned index-for-index with the bars and its last element is
//! the current value.

use crate::domain::Bar;

/// Trait for single-series indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as `bars`; the first
/// `lookback()` values are `f64::NAN` (warm-up).
///
/// No value at bar t may depend on bars after t: computing on a truncated
/// series must reproduce the prefix of the full computation.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// The current (most recent) value, or `None` during warm-up.
    fn latest(&self, bars: &[Bar]) -> Option<f64> {
        last_finite(&self.compute(bars))
    }
}

/// Last element of a series if it is a finite number.
pub fn last_finite(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Element `back` positions before the last one, if it is a finite number.
pub fn finite_back(series: &[f64], back: usize) -> Option<f64> {
    let idx = series.len().checked_sub(1 + back)?;
    series.get(idx).copied().filter(|v| v.is_finite())
}
