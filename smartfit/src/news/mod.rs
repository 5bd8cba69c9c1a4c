//! Fashion news client
//!
//! Read-only client for the third-party news search API
//! (`GET {base_url}/everything`, key in the `X-Api-Key` header). Failures
//! use the same taxonomy as the prediction client.

pub mod types;

use chrono::{Days, NaiveDate};
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::backends::http::{execute, parse_base_url};
use crate::config::NewsConfig;
use crate::error::{StyleError, StyleResult};
use types::NewsResponse;
pub use types::{Article, ArticleSource, NewsResults};

const EVERYTHING: &str = "everything";
const NEWS_DEADLINE: Duration = Duration::from_secs(30);
const API_KEY_HEADER: &str = "X-Api-Key";

/// Parameters for one news search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub query: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sort_by: String,
}

impl NewsQuery {
    /// Default search ending `today`, reaching back `lookback_days`
    pub fn recent(config: &NewsConfig, today: NaiveDate) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(config.lookback_days)))
            .unwrap_or(today);
        Self {
            query: config.query.clone(),
            from,
            to: today,
            sort_by: config.sort_by.clone(),
        }
    }

    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("q", self.query.clone()),
            ("from", self.from.format("%Y-%m-%d").to_string()),
            ("to", self.to.format("%Y-%m-%d").to_string()),
            ("sortBy", self.sort_by.clone()),
        ]
    }
}

/// News search API client
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl NewsClient {
    pub fn new(config: &NewsConfig) -> StyleResult<Self> {
        let client = Client::builder()
            .timeout(NEWS_DEADLINE)
            .user_agent(concat!("smartfit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    #[instrument(skip(self), fields(query = %query.query))]
    pub async fn search(&self, query: &NewsQuery) -> StyleResult<NewsResults> {
        let url = self
            .base_url
            .join(EVERYTHING)
            .map_err(|source| StyleError::InvalidUrl {
                url: format!("{}{}", self.base_url, EVERYTHING),
                source,
            })?;

        // key goes in a header so it never appears in a logged URL
        let request = self
            .client
            .get(url)
            .query(&query.params())
            .header(API_KEY_HEADER, self.api_key.as_str());

        let body = execute(request, NEWS_DEADLINE).await?;
        let response: NewsResponse = serde_json::from_str(&body)?;

        if let Some(status) = response.status.as_deref().filter(|s| *s != "ok") {
            tracing::warn!(status, "news API reported a non-ok status");
        }
        tracing::debug!(count = response.articles.len(), "news articles received");

        Ok(NewsResults {
            query: query.query.clone(),
            total: response.total_results,
            articles: response.articles,
        })
    }
}
