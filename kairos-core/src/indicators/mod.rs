//! Technical indicators over daily bars.
//!
//! Single-series indicators implement [`Indicator`]. Multi-output indicators
//! (MACD, Bollinger, Alligator) expose a `latest` accessor returning a typed
//! value for the most recent bar, and Bollinger additionally keeps the
//! band-per-instance `Indicator` form.

pub mod alligator;
pub mod bollinger;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod smma;

pub use alligator::{Alligator, AlligatorLines, AlligatorState, Line as AlligatorLine};
pub use bollinger::{Bollinger, BollingerBand, BollingerValue};
pub use ema::{ema_of_series, Ema};
pub use indicator::{finite_back, last_finite, Indicator};
pub use macd::{Macd, MacdSeries, MacdValue};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma};
pub use smma::smma_of_series;

pub const RSI_PERIOD: usize = 14;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

pub const SMA_FAST_PERIOD: usize = 50;
pub const SMA_SLOW_PERIOD: usize = 200;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// Williams Alligator: each line is an SMMA of the median price read
/// `*_SHIFT` bars before the latest bar.
pub const JAW_PERIOD: usize = 13;
pub const JAW_SHIFT: usize = 8;
pub const TEETH_PERIOD: usize = 8;
pub const TEETH_SHIFT: usize = 5;
pub const LIPS_PERIOD: usize = 5;
pub const LIPS_SHIFT: usize = 3;

/// Relative Bollinger bandwidth below which volatility counts as squeezed.
pub const SQUEEZE_THRESHOLD: f64 = 0.10;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Bars whose median price is exactly `medians[i]` (high = m + 1, low = m - 1).
#[cfg(test)]
pub fn make_median_bars(medians: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    medians
        .iter()
        .enumerate()
        .map(|(i, &m)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: m,
            high: m + 1.0,
            low: m - 1.0,
            close: m,
            volume: 1000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
