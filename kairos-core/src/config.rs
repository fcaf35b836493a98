//! Analysis configuration, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! lookback_days = 200
//! warmup_days = 200
//! min_bars = 50
//! request_timeout_secs = 15
//! news_limit = 3
//! ```

use crate::data::yahoo::{HttpSettings, DEFAULT_BASE_URL};
use crate::data::DEFAULT_CRYPTO_SUFFIX;
use crate::news::DEFAULT_NEWS_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Calendar days of history the report describes.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 200;
/// Extra calendar days fetched so SMA(200) is warmed up at the start of the lookback.
pub const DEFAULT_WARMUP_DAYS: u32 = 200;
/// Fewer bars than this is a hard failure.
pub const MIN_BARS: usize = 50;
/// Upper bound for `lookback_days` and `warmup_days` (about a century).
pub const MAX_WINDOW_DAYS: u32 = 36_500;
/// Upper bound for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub lookback_days: u32,
    pub warmup_days: u32,
    pub min_bars: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub news_enabled: bool,
    pub news_limit: usize,
    pub crypto_suffix: String,
    pub yahoo_base_url: String,
    /// Try the v7 history download when the chart API has nothing.
    pub history_fallback: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            warmup_days: DEFAULT_WARMUP_DAYS,
            min_bars: MIN_BARS,
            request_timeout_secs: 15,
            max_retries: 3,
            retry_base_delay_ms: 500,
            news_enabled: true,
            news_limit: DEFAULT_NEWS_LIMIT,
            crypto_suffix: DEFAULT_CRYPTO_SUFFIX.to_string(),
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            history_fallback: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bars == 0 {
            return Err(ConfigError::Invalid("min_bars must be at least 1".into()));
        }
        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookback_days must be at least 1".into()));
        }
        if self.lookback_days > MAX_WINDOW_DAYS || self.warmup_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "lookback_days and warmup_days must be at most {MAX_WINDOW_DAYS}"
            )));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "max_retries must be at most {MAX_RETRIES}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Total calendar days requested from the provider.
    pub fn window_days(&self) -> i64 {
        i64::from(self.lookback_days) + i64::from(self.warmup_days)
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            base_url: self.yahoo_base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}
