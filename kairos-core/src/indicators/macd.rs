//! Moving Average Convergence Divergence (MACD).
//!
//! Exponential variant for both the oscillator and the signal line:
//! - MACD line = EMA(fast) - EMA(slow)
//! - Signal line = EMA(signal) of the MACD line, seeded from its first `signal` valid values
//! - Histogram = MACD line - signal line
//!
//! Lookback: slow - 1 for the MACD line, slow + signal - 2 for signal and histogram.

use super::ema::ema_of_series;
use super::indicator::last_finite;
use super::{MACD_FAST, MACD_SIGNAL, MACD_SLOW};
use crate::domain::{closes, Bar};
use serde::{Deserialize, Serialize};

/// MACD reading for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdValue {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Full MACD output, each series aligned with the input bars.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow period");
        Self { fast, slow, signal }
    }

    pub fn lookback(&self) -> usize {
        self.slow + self.signal - 2
    }

    pub fn compute(&self, bars: &[Bar]) -> MacdSeries {
        let closes = closes(bars);
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = ema_of_series(&macd_line, self.signal);
        let histogram = macd_line
            .iter()
            .zip(&signal_line)
            .map(|(m, s)| m - s)
            .collect();

        MacdSeries {
            macd_line,
            signal_line,
            histogram,
        }
    }

    /// MACD tuple for the last bar, or `None` while the signal line is warming up.
    pub fn latest(&self, bars: &[Bar]) -> Option<MacdValue> {
        let series = self.compute(bars);
        Some(MacdValue {
            macd_line: last_finite(&series.macd_line)?,
            signal_line: last_finite(&series.signal_line)?,
            histogram: last_finite(&series.histogram)?,
        })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
    }
}
