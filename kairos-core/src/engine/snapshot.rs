//! One indicator pass over a resolved bar series.

use super::signals::{is_squeeze, Bias, CrossSignal, RsiZone, Trend};
use crate::domain::Bar;
use crate::indicators::{
    last_finite, Alligator, AlligatorState, Bollinger, BollingerValue, Indicator, Macd, MacdValue,
    Rsi, Sma, RSI_PERIOD, SMA_FAST_PERIOD, SMA_SLOW_PERIOD,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Every current indicator value and derived signal for the last bar.
///
/// Values that are still in warm-up are `None`; the Alligator reports 0
/// for a line whose shifted index is not yet available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub as_of: NaiveDate,
    pub bars: usize,
    pub price: f64,
    pub rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    pub macd: Option<MacdValue>,
    pub macd_bias: Option<Bias>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub trend: Trend,
    pub cross: CrossSignal,
    pub bollinger: Option<BollingerValue>,
    pub squeeze: bool,
    pub alligator: AlligatorState,
}

/// Compute the snapshot for `bars`, or `None` for an empty series.
///
/// Callers enforce the minimum history; this function only relies on
/// there being a last bar.
pub fn compute_snapshot(bars: &[Bar]) -> Option<IndicatorSnapshot> {
    let last = bars.last()?;

    let rsi = Rsi::new(RSI_PERIOD).latest(bars);
    let macd = Macd::default().latest(bars);

    let sma_fast_series = Sma::new(SMA_FAST_PERIOD).compute(bars);
    let sma_slow_series = Sma::new(SMA_SLOW_PERIOD).compute(bars);
    let sma_fast = last_finite(&sma_fast_series);
    let sma_slow = last_finite(&sma_slow_series);

    let bollinger = Bollinger::latest_default(bars);

    Some(IndicatorSnapshot {
        as_of: last.date,
        bars: bars.len(),
        price: last.close,
        rsi,
        rsi_zone: rsi.map(RsiZone::classify),
        macd,
        macd_bias: macd.as_ref().map(Bias::from_macd),
        sma_fast,
        sma_slow,
        trend: Trend::from_averages(sma_fast, sma_slow),
        cross: CrossSignal::detect(&sma_fast_series, &sma_slow_series),
        squeeze: bollinger.as_ref().is_some_and(is_squeeze),
        bollinger,
        alligator: Alligator::default().state(bars),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn empty_series_has_no_snapshot() {
        assert!(compute_snapshot(&[]).is_none());
    }

    #[test]
    fn short_series_leaves_slow_values_absent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let s = compute_snapshot(&bars).unwrap();

        assert_eq!(s.price, 159.0);
        assert_eq!(s.bars, 60);
        assert!(s.sma_fast.is_some());
        assert!(s.sma_slow.is_none());
        assert_eq!(s.trend, Trend::Undetermined);
        assert_eq!(s.cross, CrossSignal::default());
        // Monotonic rise: no losses.
        assert_eq!(s.rsi, Some(100.0));
        assert_eq!(s.rsi_zone, Some(RsiZone::Overbought));
        assert!(s.macd.is_some());
    }

    #[test]
    fn flat_series_is_squeezed_and_neutral() {
        let bars = make_bars(&[50.0; 220]);
        let s = compute_snapshot(&bars).unwrap();

        assert!(s.squeeze);
        assert_eq!(s.rsi, Some(50.0));
        assert_eq!(s.rsi_zone, Some(RsiZone::Neutral));
        assert_eq!(s.macd_bias, Some(Bias::Bearish));
        assert_eq!(s.trend, Trend::Undetermined);
        assert!(!s.cross.golden && !s.cross.death);
    }
}
