//! One trading day of price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// Bars are produced by a `DataProvider`, sorted ascending by date, and live
/// only for the duration of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Median price `(high + low) / 2`, the input of the Alligator lines.
    pub fn median(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn highs(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub fn lows(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}

pub fn medians(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(Bar::median).collect()
}
