//! Secondary signals derived from indicator values.

use crate::indicators::{BollingerValue, MacdValue, SQUEEZE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Moving-average crossover on the latest bar.
///
/// Edge-triggered: a flag is set only on the bar where the fast average
/// crosses the slow one, not on later bars where the relationship holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossSignal {
    pub golden: bool,
    pub death: bool,
}

impl CrossSignal {
    /// Compare the last two bars of two aligned series. Any non-finite value
    /// on either bar yields no signal.
    pub fn detect(fast: &[f64], slow: &[f64]) -> Self {
        let n = fast.len().min(slow.len());
        if n < 2 {
            return Self::default();
        }
        // Align on the most recent bar if lengths differ.
        let fast = &fast[fast.len() - n..];
        let slow = &slow[slow.len() - n..];

        let (f_now, s_now) = (fast[n - 1], slow[n - 1]);
        let (f_prev, s_prev) = (fast[n - 2], slow[n - 2]);
        if ![f_now, s_now, f_prev, s_prev].iter().all(|v| v.is_finite()) {
            return Self::default();
        }

        Self {
            golden: f_now > s_now && f_prev <= s_prev,
            death: f_now < s_now && f_prev >= s_prev,
        }
    }
}

/// Relative bandwidth `(upper - lower) / middle` strictly below the threshold.
pub fn is_squeeze(bands: &BollingerValue) -> bool {
    bands.middle > 0.0 && bands.relative_width() < SQUEEZE_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub const OVERBOUGHT: f64 = 70.0;
    pub const OVERSOLD: f64 = 30.0;

    pub fn classify(rsi: f64) -> Self {
        if rsi > Self::OVERBOUGHT {
            Self::Overbought
        } else if rsi < Self::OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overbought => "Overbought",
            Self::Oversold => "Oversold",
            Self::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    /// Histogram above zero is bullish; zero or below is bearish.
    pub fn from_macd(macd: &MacdValue) -> Self {
        if macd.histogram > 0.0 {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Undetermined,
}

impl Trend {
    /// SMA50 vs SMA200; undetermined when either is missing or they are equal.
    pub fn from_averages(fast: Option<f64>, slow: Option<f64>) -> Self {
        match (fast, slow) {
            (Some(f), Some(s)) if f > s => Self::Bullish,
            (Some(f), Some(s)) if f < s => Self::Bearish,
            _ => Self::Undetermined,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Undetermined => "Undetermined",
        }
    }
}
