// =============================================================================
// News headlines — NewsAPI `everything` endpoint
// =============================================================================
//
// Headlines are decoration for the presentation layer.  Every failure mode
// (no API key, transport error, non-2xx, bad payload) degrades to an empty
// list with a warning; nothing here is allowed to fail a page.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::NewsConfig;

/// One headline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

pub struct NewsClient {
    api_key: Option<String>,
    config: NewsConfig,
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new(api_key: Option<String>, config: NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client for NewsClient")?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
            client,
        })
    }

    /// Build from `NEWS_API_KEY`.
    pub fn from_env(config: NewsConfig) -> Result<Self> {
        Self::new(std::env::var("NEWS_API_KEY").ok(), config)
    }

    pub fn default_query(&self) -> &str {
        &self.config.query
    }

    /// Latest headlines for `query`; empty on any failure.
    #[instrument(skip(self), name = "news::headlines")]
    pub async fn headlines(&self, query: &str) -> Vec<Headline> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("NEWS_API_KEY is not set — no headlines available");
            return Vec::new();
        };

        match self.fetch(query, api_key).await {
            Ok(headlines) => {
                debug!(count = headlines.len(), "headlines fetched");
                headlines
            }
            Err(e) => {
                warn!(error = %e, "news request failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str, api_key: &str) -> Result<Vec<Headline>> {
        let url = format!("{}/v2/everything", self.config.base_url.trim_end_matches('/'));
        let page_size = self.config.page_size.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("pageSize", page_size.as_str()), ("apiKey", api_key)])
            .send()
            .await
            .context("GET /v2/everything request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("NewsAPI GET /v2/everything returned {}", status);
        }

        let body: NewsResponse = resp
            .json()
            .await
            .context("failed to parse news response")?;

        Ok(into_headlines(body, self.config.page_size))
    }
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("config", &self.config)
            .finish()
    }
}

/// Keep articles that have both a title and a link, up to `limit`.
fn into_headlines(body: NewsResponse, limit: usize) -> Vec<Headline> {
    body.articles
        .into_iter()
        .filter_map(|a| {
            Some(Headline {
                title: a.title.filter(|t| !t.is_empty())?,
                url: a.url.filter(|u| !u.is_empty())?,
                source: a.source.and_then(|s| s.name),
                published_at: a.published_at,
            })
        })
        .take(limit)
        .collect()
}
