//! Bollinger Bands: moving average +/- a multiple of the standard deviation.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::indicator::Indicator;
use super::{BOLLINGER_MULTIPLIER, BOLLINGER_PERIOD};
use crate::domain::{closes, Bar};
use serde::{Deserialize, Serialize};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// All three bands for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerValue {
    /// Band width relative to the middle band.
    pub fn relative_width(&self) -> f64 {
        (self.upper - self.lower) / self.middle
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }

    /// Bands for the last bar, or `None` if fewer than `period` bars.
    pub fn bands_latest(period: usize, multiplier: f64, bars: &[Bar]) -> Option<BollingerValue> {
        if period == 0 || bars.len() < period {
            return None;
        }
        let closes = closes(&bars[bars.len() - period..]);
        let value = band_value(&closes, multiplier)?;
        value.middle.is_finite().then_some(value)
    }

    /// Default 20-period, 2σ bands for the last bar.
    pub fn latest_default(bars: &[Bar]) -> Option<BollingerValue> {
        Self::bands_latest(BOLLINGER_PERIOD, BOLLINGER_MULTIPLIER, bars)
    }
}

/// Mean and population stddev of one window, or `None` if it contains NaN.
fn band_value(window: &[f64], multiplier: f64) -> Option<BollingerValue> {
    if window.iter().any(|v| v.is_nan()) {
        return None;
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    Some(BollingerValue {
        upper: mean + multiplier * stddev,
        middle: mean,
        lower: mean - multiplier * stddev,
    })
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for (i, window) in closes.windows(self.period).enumerate() {
            let Some(value) = band_value(window, self.multiplier) else {
                continue;
            };
            result[i + self.period - 1] = match self.band {
                BollingerBand::Upper => value.upper,
                BollingerBand::Middle => value.middle,
                BollingerBand::Lower => value.lower,
            };
        }

        result
    }
}
