//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).
//! A NaN anywhere in the window yields NaN for that bar.

use super::indicator::Indicator;
use crate::domain::{closes, Bar};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        sma_of_series(&closes(bars), self.period)
    }
}

/// Rolling mean of an arbitrary series.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];

        if leaving.is_nan() || entering.is_nan() || sum.is_nan() {
            // The running sum cannot recover from NaN; rescan the window.
            sum = values[(i + 1 - period)..=i].iter().sum();
        } else {
            sum += entering - leaving;
        }
        result[i] = sum / period as f64;
    }

    result
}
