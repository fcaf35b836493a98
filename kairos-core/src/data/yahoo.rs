//! Yahoo Finance price-history providers.
//!
//! Two strategies share one HTTP client and circuit breaker:
//! - [`YahooChartProvider`]: v8 chart JSON API (primary)
//! - [`YahooHistoryProvider`]: v7 history download CSV (fallback)
//!
//! Yahoo has no official API and is subject to unannounced format changes,
//! which is why a second endpoint is kept as fallback.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// HTTP settings shared by every Yahoo endpoint.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Blocking HTTP client with retry, backoff, and circuit breaker handling.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    circuit_breaker: Arc<CircuitBreaker>,
    settings: HttpSettings,
}

impl YahooClient {
    pub fn new(settings: HttpSettings, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            settings,
        })
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    /// `{base_url}/{segments...}?{query...}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|e| DataError::InvalidRequest(format!("bad base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| DataError::InvalidRequest("base url cannot hold a path".into()))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET with retry. 403 trips the breaker, 404 means unknown symbol,
    /// 429/5xx/connect errors are retried with exponential backoff.
    pub fn get(&self, url: &Url, symbol: &str) -> Result<Response, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                std::thread::sleep(backoff_delay(self.settings.base_delay, attempt));
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            debug!(%symbol, attempt, url = %url, "yahoo request");

            let resp = match self.client.get(url.clone()).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            match status {
                StatusCode::FORBIDDEN => {
                    self.circuit_breaker.trip();
                    return Err(DataError::CircuitBreakerTripped);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    self.circuit_breaker.record_failure();
                    let retry_after = resp
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);
                    last_error = Some(DataError::RateLimited {
                        retry_after_secs: retry_after,
                    });
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(DataError::AuthenticationRequired(format!(
                        "Yahoo Finance refused {} without credentials",
                        url.path()
                    )));
                }
                StatusCode::NOT_FOUND => {
                    return Err(DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    });
                }
                s if s.is_success() => {
                    self.circuit_breaker.record_success();
                    return Ok(resp);
                }
                s if s.is_server_error() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::Other(format!("HTTP {s} for {symbol}")));
                }
                s => return Err(DataError::Other(format!("HTTP {s} for {symbol}"))),
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

/// Longest pause between two attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// `base * 2^(attempt - 1)`, capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

fn day_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
    let end_ts = end
        .succ_opt()
        .unwrap_or(end)
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp()
        - 1;
    (start_ts, end_ts)
}

// ── v8 chart API ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Primary strategy: Yahoo v8 chart JSON.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    client: YahooClient,
}

impl YahooChartProvider {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }

    /// Parse a chart response body into bars.
    ///
    /// Bars missing high, low, or close (holidays, the unfinished session)
    /// are skipped; a missing open falls back to the close.
    pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<Bar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse chart for {symbol}: {e}"))
        })?;

        let Some(result) = resp.chart.result else {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                },
                Some(err) => {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
                None => DataError::ResponseFormatChanged("empty result with no error".into()),
            });
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // A listed symbol with no trades in range has no timestamp array.
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let at = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            let (Some(high), Some(low), Some(close)) = (at(&quote.high), at(&quote.low), at(&quote.close))
            else {
                continue;
            };

            bars.push(Bar {
                date,
                open: at(&quote.open).unwrap_or(close),
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }
}

impl DataProvider for YahooChartProvider {
    fn name(&self) -> &str {
        "yahoo_chart"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let (period1, period2) = day_bounds(start, end);
        let url = self.client.endpoint(
            &["v8", "finance", "chart", symbol],
            &[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ],
        )?;

        let body = self
            .client
            .get(&url, symbol)?
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: Self::parse_chart(symbol, &body)?,
            source: DataSource::YahooChart,
        })
    }

    fn is_available(&self) -> bool {
        self.client.circuit_breaker().is_allowed()
    }
}

// ── v7 history download ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: String,
    #[serde(rename = "High")]
    high: String,
    #[serde(rename = "Low")]
    low: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Volume", default)]
    volume: String,
}

/// Yahoo writes missing values as the literal `null`.
fn cell<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

/// Fallback strategy: Yahoo v7 history CSV download.
#[derive(Debug, Clone)]
pub struct YahooHistoryProvider {
    client: YahooClient,
}

impl YahooHistoryProvider {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }

    /// Parse a `Date,Open,High,Low,Close,Adj Close,Volume` CSV body into bars.
    pub fn parse_history(symbol: &str, body: &str) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let mut bars = Vec::new();
        for row in reader.deserialize::<HistoryRow>() {
            let row = row.map_err(|e| {
                DataError::ResponseFormatChanged(format!("bad history row for {symbol}: {e}"))
            })?;

            let (Some(high), Some(low), Some(close)) =
                (cell::<f64>(&row.high), cell::<f64>(&row.low), cell::<f64>(&row.close))
            else {
                continue;
            };

            bars.push(Bar {
                date: row.date,
                open: cell(&row.open).unwrap_or(close),
                high,
                low,
                close,
                volume: cell(&row.volume).unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }
}

impl DataProvider for YahooHistoryProvider {
    fn name(&self) -> &str {
        "yahoo_history"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let (period1, period2) = day_bounds(start, end);
        let url = self.client.endpoint(
            &["v7", "finance", "download", symbol],
            &[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ],
        )?;

        let body = self
            .client
            .get(&url, symbol)?
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: Self::parse_history(symbol, &body)?,
            source: DataSource::YahooHistory,
        })
    }

    fn is_available(&self) -> bool {
        self.client.circuit_breaker().is_allowed()
    }
}
