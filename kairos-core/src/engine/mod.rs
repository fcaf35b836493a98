//! Indicator engine: fetch, compute, summarize.
//!
//! `IndicatorEngine::analyze` is request-scoped and stateless. Price history
//! and headlines are fetched concurrently; the price side is fatal on
//! failure, the news side only degrades the report.

pub mod report;
pub mod signals;
pub mod snapshot;

pub use report::render;
pub use signals::{is_squeeze, Bias, CrossSignal, RsiZone, Trend};
pub use snapshot::{compute_snapshot, IndicatorSnapshot};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data::{
    CircuitBreaker, DataError, DataProvider, DataSource, FetchAttempt, FetchChain,
    YahooChartProvider, YahooClient, YahooHistoryProvider,
};
use crate::indicators::{AlligatorState, MacdValue};
use crate::news::{Headline, NewsSource, YahooNewsSource};
use chrono::{Duration, NaiveDate, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("could not find market data for '{symbol}'; try appending -USD for crypto (e.g. {symbol}-USD)")]
    DataNotFound {
        symbol: String,
        attempts: Vec<FetchAttempt>,
    },

    #[error("insufficient data fetched for '{symbol}': {bars} bars, need at least {required}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        required: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up data provider: {0}")]
    Setup(#[from] DataError),
}

/// Headline numbers for programmatic consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdValue>,
    pub alligator: AlligatorState,
    /// Close of the last bar.
    pub price: f64,
}

impl From<&IndicatorSnapshot> for RawIndicators {
    fn from(s: &IndicatorSnapshot) -> Self {
        Self {
            rsi: s.rsi,
            macd: s.macd,
            alligator: s.alligator,
            price: s.price,
        }
    }
}

/// Result of one analysis: the rendered report plus the numbers behind it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Symbol that produced data (may carry the crypto suffix).
    pub symbol: String,
    pub requested: String,
    pub provider: String,
    pub source: DataSource,
    pub summary: String,
    pub raw: RawIndicators,
    pub snapshot: IndicatorSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<Headline>,
}

pub struct IndicatorEngine {
    chain: FetchChain,
    news: Option<Arc<dyn NewsSource>>,
    config: AnalysisConfig,
    as_of: Option<NaiveDate>,
}

impl std::fmt::Debug for IndicatorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorEngine")
            .field("chain", &self.chain)
            .field("news", &self.news.as_ref().map(|n| n.name()))
            .field("config", &self.config)
            .field("as_of", &self.as_of)
            .finish()
    }
}

impl IndicatorEngine {
    /// Engine over an explicit fetch chain, without news.
    pub fn new(chain: FetchChain, config: AnalysisConfig) -> Self {
        let chain = chain.with_crypto_suffix(config.crypto_suffix.clone());
        Self {
            chain,
            news: None,
            config,
            as_of: None,
        }
    }

    /// Yahoo chart API first, then the history download if enabled, with
    /// Yahoo search headlines. The price strategies share one circuit
    /// breaker; the news source gets its own so a blocked search endpoint
    /// never stops price fetches.
    pub fn yahoo(config: AnalysisConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let price_client = YahooClient::new(
            config.http_settings(),
            Arc::new(CircuitBreaker::default_provider()),
        )?;

        let mut providers: Vec<Arc<dyn DataProvider>> =
            vec![Arc::new(YahooChartProvider::new(price_client.clone()))];
        if config.history_fallback {
            providers.push(Arc::new(YahooHistoryProvider::new(price_client)));
        }

        let news_client = if config.news_enabled {
            Some(YahooClient::new(
                config.http_settings(),
                Arc::new(CircuitBreaker::default_provider()),
            )?)
        } else {
            None
        };

        let engine = Self::new(FetchChain::new(providers), config);
        Ok(match news_client {
            Some(client) => engine.with_news(Arc::new(YahooNewsSource::new(client))),
            None => engine,
        })
    }

    pub fn with_news(mut self, source: Arc<dyn NewsSource>) -> Self {
        self.news = Some(source);
        self
    }

    /// Pin the end of the fetch window instead of using today's date.
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// `(start, end)` of the calendar window requested from providers.
    pub fn window(&self) -> Result<(NaiveDate, NaiveDate), EngineError> {
        let end = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let days = self.config.window_days();
        let start = Duration::try_days(days)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                ConfigError::Invalid(format!("a {days}-day window before {end} is out of range"))
            })?;
        Ok((start, end))
    }

    pub fn analyze(&self, symbol: &str) -> Result<AnalysisSummary, EngineError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(EngineError::EmptySymbol);
        }

        let (start, end) = self.window()?;
        let (resolved, news) = rayon::join(
            || self.chain.resolve(symbol, start, end),
            || self.headlines(symbol),
        );

        let series = resolved.map_err(|attempts| EngineError::DataNotFound {
            symbol: symbol.to_string(),
            attempts,
        })?;

        let required = self.config.min_bars;
        if series.bars.len() < required {
            return Err(EngineError::InsufficientData {
                symbol: series.resolved,
                bars: series.bars.len(),
                required,
            });
        }

        let snapshot = compute_snapshot(&series.bars).ok_or_else(|| EngineError::InsufficientData {
            symbol: series.resolved.clone(),
            bars: 0,
            required,
        })?;

        let summary = render(&series.resolved, &snapshot, &news);
        info!(
            symbol = %series.resolved,
            bars = snapshot.bars,
            price = snapshot.price,
            headlines = news.len(),
            fallback = series.used_fallback_symbol(),
            "analysis complete"
        );

        Ok(AnalysisSummary {
            raw: RawIndicators::from(&snapshot),
            symbol: series.resolved,
            requested: series.requested,
            provider: series.provider,
            source: series.source,
            summary,
            snapshot,
            news,
        })
    }

    /// Analyze independent symbols in parallel; results keep input order.
    pub fn analyze_many<S: AsRef<str> + Sync>(
        &self,
        symbols: &[S],
    ) -> Vec<Result<AnalysisSummary, EngineError>> {
        symbols.par_iter().map(|s| self.analyze(s.as_ref())).collect()
    }

    fn headlines(&self, symbol: &str) -> Vec<Headline> {
        let Some(source) = self.news.as_ref().filter(|_| self.config.news_enabled) else {
            return Vec::new();
        };
        match source.headlines(symbol, self.config.news_limit) {
            Ok(mut headlines) => {
                headlines.truncate(self.config.news_limit);
                headlines
            }
            Err(error) => {
                warn!(%symbol, source = source.name(), %error, "news lookup failed, omitting headlines");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryProvider;
    use crate::indicators::make_bars;

    fn engine_with(provider: InMemoryProvider) -> IndicatorEngine {
        let chain = FetchChain::new(vec![Arc::new(provider.ignoring_range())]);
        IndicatorEngine::new(chain, AnalysisConfig::default())
            .with_as_of(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
    }

    #[test]
    fn blank_symbol_is_rejected() {
        let engine = engine_with(InMemoryProvider::new());
        assert!(matches!(engine.analyze("   "), Err(EngineError::EmptySymbol)));
    }

    #[test]
    fn window_spans_lookback_and_warmup() {
        let engine = engine_with(InMemoryProvider::new());
        let (start, end) = engine.window().unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!((end - start).num_days(), 400);
    }

    #[test]
    fn unknown_symbol_reports_every_attempt() {
        let engine = engine_with(InMemoryProvider::new());
        match engine.analyze("NOPE") {
            Err(EngineError::DataNotFound { symbol, attempts }) => {
                assert_eq!(symbol, "NOPE");
                // NOPE and NOPE-USD against the single provider.
                assert_eq!(attempts.len(), 2);
            }
            other => panic!("expected DataNotFound, got {other:?}"),
        }
    }

    #[test]
    fn data_not_found_message_suggests_suffix() {
        let err = EngineError::DataNotFound {
            symbol: "ETH".into(),
            attempts: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "could not find market data for 'ETH'; try appending -USD for crypto (e.g. ETH-USD)"
        );
    }

    #[test]
    fn symbol_is_trimmed_before_lookup() {
        let closes: Vec<f64> = (0..80).map(|i| 10.0 + i as f64 * 0.1).collect();
        let engine = engine_with(InMemoryProvider::new().with_series("QQQ", make_bars(&closes)));
        let summary = engine.analyze("  QQQ ").unwrap();
        assert_eq!(summary.symbol, "QQQ");
        assert!(summary.summary.starts_with("--- MARKET CONTEXT: QQQ ---"));
    }

    #[test]
    fn raw_serializes_camel_case() {
        let closes: Vec<f64> = (0..80).map(|i| 10.0 + (i % 7) as f64).collect();
        let engine = engine_with(InMemoryProvider::new().with_series("QQQ", make_bars(&closes)));
        let summary = engine.analyze("QQQ").unwrap();
        let json = serde_json::to_value(&summary.raw).unwrap();
        assert!(json["macd"]["signalLine"].is_number());
        assert!(json["alligator"]["jaw"].is_number());
        assert_eq!(json["price"].as_f64(), Some(*closes.last().unwrap()));
    }

    #[test]
    fn oversized_window_is_an_error() {
        let config = AnalysisConfig {
            lookback_days: 4_000_000_000,
            ..AnalysisConfig::default()
        };
        let provider = InMemoryProvider::new().with_series("SPY", make_bars(&[1.0; 60]));
        let engine = IndicatorEngine::new(FetchChain::new(vec![Arc::new(provider)]), config)
            .with_as_of(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        assert!(matches!(engine.window(), Err(EngineError::Config(_))));
        assert!(matches!(engine.analyze("SPY"), Err(EngineError::Config(_))));
    }

    #[test]
    fn yahoo_engine_rejects_invalid_config() {
        let config = AnalysisConfig {
            max_retries: 40,
            ..AnalysisConfig::default()
        };
        assert!(matches!(IndicatorEngine::yahoo(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn blocked_news_endpoint_leaves_prices_reachable() {
        use crate::data::test_server::{chart_body, StubServer};

        let closes: Vec<f64> = (0..80).map(|i| 50.0 + (i % 9) as f64).collect();
        let server = StubServer::start(move |path| {
            if path.starts_with("/v1/finance/search") {
                (403, String::new())
            } else if path == "/v8/finance/chart/SPY" {
                (200, chart_body(&closes))
            } else {
                (404, String::new())
            }
        });
        let config = AnalysisConfig {
            yahoo_base_url: server.base_url.clone(),
            retry_base_delay_ms: 1,
            history_fallback: false,
            ..AnalysisConfig::default()
        };
        let engine = IndicatorEngine::yahoo(config)
            .unwrap()
            .with_as_of(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        for _ in 0..3 {
            let summary = engine.analyze("SPY").unwrap();
            assert_eq!(summary.snapshot.bars, 80);
            assert!(summary.news.is_empty());
        }
        assert_eq!(server.hits("/v8/finance/chart/SPY"), 3);
        // The first 403 opens the news breaker; later lookups never leave the process.
        assert_eq!(server.hits("/v1/finance/search"), 1);
    }
}
