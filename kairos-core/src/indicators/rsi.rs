//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; no movement → 50.

use super::indicator::Indicator;
use crate::domain::{closes, Bar};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rsi_of_series(&closes(bars), self.period)
    }
}

/// RSI of an arbitrary price series.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let split = |change: f64| -> (f64, f64) {
        if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        }
    };

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for w in values[..=period].windows(2) {
        let change = w[1] - w[0];
        if change.is_nan() {
            return result;
        }
        let (gain, loss) = split(change);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = rsi_value(avg_gain, avg_loss);

    let smoothing = (period - 1) as f64;
    for i in (period + 1)..n {
        let change = values[i] - values[i - 1];
        if change.is_nan() {
            return result;
        }
        let (gain, loss) = split(change);
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
        result[i] = rsi_value(avg_gain, avg_loss);
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
