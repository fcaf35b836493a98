//! Optional headline enrichment.
//!
//! News never decides whether an analysis succeeds: the engine logs a
//! failed lookup and renders the report without a news section.

pub mod yahoo;

pub use yahoo::YahooNewsSource;

use crate::data::DataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NEWS_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[from] DataError),

    #[error("news response format changed: {0}")]
    Format(String),
}

pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Up to `limit` recent headlines for `symbol`, newest first.
    fn headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>, NewsError>;
}
