//! Yahoo Finance search endpoint as a headline source.

use super::{Headline, NewsError, NewsSource};
use crate::data::YahooClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: String,
    publisher: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct YahooNewsSource {
    client: YahooClient,
}

impl YahooNewsSource {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }

    pub fn parse_search(body: &str, limit: usize) -> Result<Vec<Headline>, NewsError> {
        let resp: SearchResponse =
            serde_json::from_str(body).map_err(|e| NewsError::Format(e.to_string()))?;

        Ok(resp
            .news
            .into_iter()
            .filter(|n| !n.title.trim().is_empty())
            .take(limit)
            .map(|n| Headline {
                title: n.title.trim().to_string(),
                publisher: n.publisher,
                link: n.link,
                published: n
                    .provider_publish_time
                    .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
            })
            .collect())
    }
}

impl NewsSource for YahooNewsSource {
    fn name(&self) -> &str {
        "yahoo_search"
    }

    fn headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>, NewsError> {
        let url = self.client.endpoint(
            &["v1", "finance", "search"],
            &[
                ("q", symbol.to_string()),
                ("newsCount", limit.to_string()),
                ("quotesCount", "0".to_string()),
            ],
        )?;
        let body = self
            .client
            .get(&url, symbol)?
            .text()
            .map_err(|e| NewsError::Format(e.to_string()))?;
        Self::parse_search(&body, limit)
    }
}
