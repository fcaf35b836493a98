//! Plain-text market-context block.
//!
//! The layout is consumed verbatim by downstream prompt construction, so
//! section labels and precision are fixed: prices 2 decimals, RSI 2,
//! MACD 3, Alligator lines 4. Missing values render as `N/A`.

use super::snapshot::IndicatorSnapshot;
use crate::indicators::{BOLLINGER_MULTIPLIER, BOLLINGER_PERIOD, RSI_PERIOD, SMA_FAST_PERIOD, SMA_SLOW_PERIOD};
use crate::news::Headline;

const MISSING: &str = "N/A";

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => MISSING.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Render the report for `symbol`. The news section is omitted when `news` is empty.
pub fn render(symbol: &str, s: &IndicatorSnapshot, news: &[Headline]) -> String {
    let mut report = format!("--- MARKET CONTEXT: {symbol} ---\n");

    if !news.is_empty() {
        report.push_str("RECENT NEWS:\n");
        for headline in news {
            match &headline.publisher {
                Some(publisher) => report.push_str(&format!("- {} ({publisher})\n", headline.title)),
                None => report.push_str(&format!("- {}\n", headline.title)),
            }
        }
    }

    report.push_str(&format!("CURRENT PRICE: {:.2}\n", s.price));

    let zone = s.rsi_zone.map(|z| z.label()).unwrap_or(MISSING);
    report.push_str(&format!("RSI ({RSI_PERIOD}): {} ({zone})\n", fixed(s.rsi, 2)));

    match (&s.macd, s.macd_bias) {
        (Some(m), Some(bias)) => report.push_str(&format!(
            "MACD: histogram {:.3}, signal {:.3}, line {:.3} ({})\n",
            m.histogram,
            m.signal_line,
            m.macd_line,
            bias.label()
        )),
        _ => report.push_str(&format!("MACD: {MISSING}\n")),
    }

    report.push_str(&format!(
        "SMA {SMA_FAST_PERIOD}: {} | SMA {SMA_SLOW_PERIOD}: {} | Trend: {}\n\
         GOLDEN CROSS: {} | DEATH CROSS: {}\n",
        fixed(s.sma_fast, 2),
        fixed(s.sma_slow, 2),
        s.trend.label(),
        yes_no(s.cross.golden),
        yes_no(s.cross.death)
    ));

    let bands = match &s.bollinger {
        Some(b) => format!("upper {:.2}, middle {:.2}, lower {:.2}", b.upper, b.middle, b.lower),
        None => MISSING.to_string(),
    };
    report.push_str(&format!(
        "BOLLINGER BANDS ({BOLLINGER_PERIOD}, {BOLLINGER_MULTIPLIER}): {bands}\n\
         VOLATILITY SQUEEZE: {}\n\
         ALLIGATOR: jaw {:.4}, teeth {:.4}, lips {:.4}",
        yes_no(s.squeeze),
        s.alligator.jaw,
        s.alligator.teeth,
        s.alligator.lips
    ));

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::signals::{Bias, CrossSignal, RsiZone, Trend};
    use crate::indicators::{AlligatorState, BollingerValue, MacdValue};
    use chrono::NaiveDate;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            bars: 276,
            price: 101.256,
            rsi: Some(71.234),
            rsi_zone: Some(RsiZone::Overbought),
            macd: Some(MacdValue {
                macd_line: 1.23456,
                signal_line: 1.0,
                histogram: 0.23456,
            }),
            macd_bias: Some(Bias::Bullish),
            sma_fast: Some(99.5),
            sma_slow: Some(95.25),
            trend: Trend::Bullish,
            cross: CrossSignal {
                golden: true,
                death: false,
            },
            bollinger: Some(BollingerValue {
                upper: 104.0,
                middle: 100.0,
                lower: 96.0,
            }),
            squeeze: true,
            alligator: AlligatorState {
                jaw: 98.123456,
                teeth: 99.0,
                lips: 100.5,
            },
        }
    }

    #[test]
    fn renders_every_section() {
        let text = render("SPY", &snapshot(), &[]);
        let expected = "\
--- MARKET CONTEXT: SPY ---
CURRENT PRICE: 101.26
RSI (14): 71.23 (Overbought)
MACD: histogram 0.235, signal 1.000, line 1.235 (Bullish)
SMA 50: 99.50 | SMA 200: 95.25 | Trend: Bullish
GOLDEN CROSS: YES | DEATH CROSS: NO
BOLLINGER BANDS (20, 2): upper 104.00, middle 100.00, lower 96.00
VOLATILITY SQUEEZE: YES
ALLIGATOR: jaw 98.1235, teeth 99.0000, lips 100.5000";
        assert_eq!(text, expected);
    }

    #[test]
    fn news_section_lists_headlines() {
        let news = vec![
            Headline {
                title: "Fed holds rates".into(),
                publisher: Some("Reuters".into()),
                link: None,
                published: None,
            },
            Headline {
                title: "Tech leads rally".into(),
                publisher: None,
                link: None,
                published: None,
            },
        ];
        let text = render("SPY", &snapshot(), &news);
        assert!(text.contains("RECENT NEWS:\n- Fed holds rates (Reuters)\n- Tech leads rally\nCURRENT PRICE"));
    }

    #[test]
    fn missing_values_render_placeholder() {
        let mut s = snapshot();
        s.rsi = None;
        s.rsi_zone = None;
        s.macd = None;
        s.macd_bias = None;
        s.sma_slow = None;
        s.trend = Trend::Undetermined;
        s.bollinger = None;
        let text = render("XYZ", &s, &[]);
        assert!(text.contains("RSI (14): N/A (N/A)"));
        assert!(text.contains("MACD: N/A"));
        assert!(text.contains("SMA 200: N/A | Trend: Undetermined"));
        assert!(text.contains("BOLLINGER BANDS (20, 2): N/A"));
        assert!(!text.contains("RECENT NEWS"));
    }
}
