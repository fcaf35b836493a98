//! Synthetic price history for offline runs.
//!
//! A seeded random walk from 100.0. The seed is derived from the symbol so
//! the same symbol always yields the same series. Bars are tagged
//! `DataSource::Synthetic` and must never be mistaken for market data.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider {
    /// Mixed into the per-symbol seed; 0 reproduces the default series.
    salt: u64,
    /// Emit weekend bars too (crypto-style calendar).
    include_weekends: bool,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    pub fn with_weekends(mut self, include_weekends: bool) -> Self {
        self.include_weekends = include_weekends;
        self
    }

    /// FNV-1a over the symbol bytes.
    fn seed(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64 ^ self.salt, |h, b| {
                (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.seed(symbol));
        let mut bars = Vec::new();
        let mut price = 100.0_f64;

        for date in start.iter_days().take_while(|d| *d <= end) {
            if !self.include_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(500_000..5_000_000u64),
            });
            price = close;
        }

        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        if start > end {
            return Err(DataError::InvalidRequest(format!("start {start} is after end {end}")));
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.generate(symbol, start, end),
            source: DataSource::Synthetic,
        })
    }
}
