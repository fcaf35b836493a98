//! In-memory provider over bars the caller already holds.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Serves pre-loaded series keyed by symbol, filtered to the requested range.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<Bar>>,
    ignore_range: bool,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    /// Serve the whole stored series regardless of the requested dates.
    pub fn ignoring_range(mut self) -> Self {
        self.ignore_range = true;
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.series.insert(symbol.into(), bars);
    }
}

impl DataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let stored = self.series.get(symbol).ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;

        let bars = stored
            .iter()
            .filter(|b| self.ignore_range || (start..=end).contains(&b.date))
            .cloned()
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::InMemory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn filters_to_requested_range() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let provider = InMemoryProvider::new().with_series("SPY", bars.clone());
        let result = provider.fetch("SPY", bars[1].date, bars[2].date).unwrap();
        assert_eq!(result.bars.len(), 2);
        assert_eq!(result.source, DataSource::InMemory);
    }

    #[test]
    fn ignoring_range_serves_everything() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let provider = InMemoryProvider::new()
            .with_series("SPY", bars.clone())
            .ignoring_range();
        let day = bars[0].date;
        assert_eq!(provider.fetch("SPY", day, day).unwrap().bars.len(), 3);
    }

    #[test]
    fn unknown_symbol_is_not_found() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(matches!(
            InMemoryProvider::new().fetch("NOPE", day, day),
            Err(DataError::SymbolNotFound { .. })
        ));
    }
}
