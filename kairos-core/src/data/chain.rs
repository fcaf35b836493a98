//! Ordered fetch strategies with symbol fallback.
//!
//! Every candidate symbol (the requested one, then the crypto-suffixed
//! form) is tried against every provider in order. The first non-empty
//! series wins; failures are collected so the caller can report them.

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::Bar;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_CRYPTO_SUFFIX: &str = "-USD";

/// One failed (symbol, provider) attempt.
#[derive(Debug)]
pub struct FetchAttempt {
    pub symbol: String,
    pub provider: String,
    pub error: DataError,
}

/// Bars resolved through the chain, with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedSeries {
    /// Symbol the caller asked for.
    pub requested: String,
    /// Symbol that actually produced data (may carry the crypto suffix).
    pub resolved: String,
    pub provider: String,
    pub source: DataSource,
    /// Ascending by date, one bar per date, no void bars.
    pub bars: Vec<Bar>,
}

impl ResolvedSeries {
    pub fn used_fallback_symbol(&self) -> bool {
        self.requested != self.resolved
    }
}

#[derive(Clone)]
pub struct FetchChain {
    providers: Vec<Arc<dyn DataProvider>>,
    crypto_suffix: String,
}

impl std::fmt::Debug for FetchChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("FetchChain")
            .field("providers", &names)
            .field("crypto_suffix", &self.crypto_suffix)
            .finish()
    }
}

impl FetchChain {
    pub fn new(providers: Vec<Arc<dyn DataProvider>>) -> Self {
        Self {
            providers,
            crypto_suffix: DEFAULT_CRYPTO_SUFFIX.to_string(),
        }
    }

    pub fn with_crypto_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.crypto_suffix = suffix.into();
        self
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name())
    }

    /// Symbols to try, in order. The suffixed form is skipped when the
    /// symbol already carries it or no suffix is configured.
    pub fn candidates(&self, symbol: &str) -> Vec<String> {
        let mut out = vec![symbol.to_string()];
        let suffix = self.crypto_suffix.to_ascii_uppercase();
        if !suffix.is_empty() && !symbol.to_ascii_uppercase().ends_with(&suffix) {
            out.push(format!("{symbol}{}", self.crypto_suffix));
        }
        out
    }

    /// Resolve bars for `symbol`, or every failed attempt if nothing produced data.
    pub fn resolve(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ResolvedSeries, Vec<FetchAttempt>> {
        let mut attempts = Vec::new();

        for candidate in self.candidates(symbol) {
            if candidate != symbol {
                warn!(%symbol, fallback = %candidate, "no data for symbol, retrying with suffix");
            }

            for provider in &self.providers {
                if !provider.is_available() {
                    attempts.push(FetchAttempt {
                        symbol: candidate.clone(),
                        provider: provider.name().to_string(),
                        error: DataError::CircuitBreakerTripped,
                    });
                    continue;
                }

                debug!(symbol = %candidate, provider = provider.name(), "fetching bars");
                let result = provider
                    .fetch(&candidate, start, end)
                    .map(|fetched| (fetched.source, normalize(&candidate, fetched.bars)));

                match result {
                    Ok((source, bars)) if !bars.is_empty() => {
                        info!(
                            %symbol,
                            resolved = %candidate,
                            provider = provider.name(),
                            bars = bars.len(),
                            "price history resolved"
                        );
                        return Ok(ResolvedSeries {
                            requested: symbol.to_string(),
                            resolved: candidate,
                            provider: provider.name().to_string(),
                            source,
                            bars,
                        });
                    }
                    Ok(_) => attempts.push(FetchAttempt {
                        symbol: candidate.clone(),
                        provider: provider.name().to_string(),
                        error: DataError::SymbolNotFound {
                            symbol: candidate.clone(),
                        },
                    }),
                    Err(error) => {
                        debug!(symbol = %candidate, provider = provider.name(), %error, "fetch failed");
                        attempts.push(FetchAttempt {
                            symbol: candidate.clone(),
                            provider: provider.name().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        Err(attempts)
    }
}

/// Sort ascending by date, keep the last bar per date, drop void or
/// inconsistent bars.
fn normalize(symbol: &str, mut bars: Vec<Bar>) -> Vec<Bar> {
    let fetched = bars.len();
    bars.retain(Bar::is_sane);
    if bars.len() < fetched {
        warn!(%symbol, dropped = fetched - bars.len(), "dropped void or inconsistent bars");
    }
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
