//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use kairos_core::domain::Bar;

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

/// One daily bar per close, starting 2023-01-02, open at the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 10_000,
            }
        })
        .collect()
}

/// Bars whose median price is exactly `medians[i]`.
pub fn bars_from_medians(medians: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    medians
        .iter()
        .enumerate()
        .map(|(i, &m)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: m,
            high: m + 1.0,
            low: m - 1.0,
            close: m,
            volume: 10_000,
        })
        .collect()
}

/// Deterministic wavy walk with realistic variation.
pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + (t * 0.13).sin() * 8.0 + (t * 0.031).cos() * 5.0 + t * 0.02
        })
        .collect()
}
