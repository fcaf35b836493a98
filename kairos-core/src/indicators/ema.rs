//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: SMA of the first `period` finite values.
//! Lookback: period - 1 (for a series with no leading NaN).

use super::indicator::Indicator;
use crate::domain::{closes, Bar};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.period)
    }
}

/// EMA of an arbitrary series.
///
/// Leading NaN values (the warm-up of an upstream indicator) are skipped, so
/// the seed window starts at the first finite value. This lets MACD feed its
/// own NaN-prefixed line into the signal EMA. A NaN after the seed taints the
/// remainder of the series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }
    let Some(first) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };
    let seed_end = first + period;
    if seed_end > n {
        return result;
    }

    let window = &values[first..seed_end];
    if window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = window.iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}
