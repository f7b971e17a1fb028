//! Meilisearch HTTP client.
//!
//! Speaks the plain REST API (`POST /indexes/{uid}/search`,
//! `GET /health`) rather than pulling in an SDK. Ranking scores are
//! requested with `showRankingScore` and surfaced as the hit score.
//!
//! Source filtering is done client-side with case-folded substring
//! matching: the dictionary index does not declare `source` as a
//! filterable attribute, so the client over-fetches and trims, the
//! same way the service has always done it.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendConfig, MAX_FETCH_LIMIT};
use crate::index::{ContextSize, Hit, SearchIndex};

/// Client for one Meilisearch index.
#[derive(Debug, Clone)]
pub struct MeiliIndex {
    http: reqwest::Client,
    host: String,
    index_uid: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequestBody<'a> {
    q: &'a str,
    limit: usize,
    #[serde(rename = "showRankingScore")]
    show_ranking_score: bool,
    #[serde(rename = "attributesToRetrieve")]
    attributes_to_retrieve: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    id: serde_json::Value,
    #[serde(default)]
    term: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    source: String,
    #[serde(rename = "_rankingScore", default)]
    ranking_score: f64,
    #[serde(default)]
    expanded_context: Option<String>,
    #[serde(default)]
    full_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponseBody {
    status: String,
}

impl MeiliIndex {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client for Meilisearch")?;

        Ok(Self {
            http,
            host: config.host.trim_end_matches('/').to_string(),
            index_uid: config.index_uid.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn attributes_for(context: ContextSize) -> Vec<&'static str> {
        let mut attributes = vec!["id", "term", "definition", "source"];
        match context {
            ContextSize::Default => {}
            ContextSize::Expanded => attributes.push("expanded_context"),
            ContextSize::Full => attributes.push("full_context"),
        }
        attributes
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

impl RawHit {
    fn into_hit(self, context: ContextSize) -> Hit {
        let expanded_context = match context {
            ContextSize::Default => None,
            ContextSize::Expanded => self.expanded_context,
            // The full window is reported under the one context field
            // the response schema exposes.
            ContextSize::Full => self.full_context.or(self.expanded_context),
        };

        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Hit {
            id,
            term: self.term,
            definition: self.definition,
            score: self.ranking_score.clamp(0.0, 1.0),
            source: self.source,
            expanded_context,
        }
    }
}

#[async_trait]
impl SearchIndex for MeiliIndex {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        source_filter: Option<&str>,
        context: ContextSize,
    ) -> Result<Vec<Hit>> {
        // Over-fetch when filtering client-side so trimming still
        // leaves enough hits.
        let fetch_limit = match source_filter {
            Some(_) => MAX_FETCH_LIMIT,
            None => limit.min(MAX_FETCH_LIMIT),
        };

        let body = SearchRequestBody {
            q: query,
            limit: fetch_limit,
            show_ranking_score: true,
            attributes_to_retrieve: Self::attributes_for(context),
        };

        let url = format!("{}/indexes/{}/search", self.host, self.index_uid);
        let response = self
            .authorized(self.http.post(&url).json(&body))
            .send()
            .await
            .with_context(|| format!("search request to {url} failed"))?
            .error_for_status()
            .context("Meilisearch rejected the search request")?;

        let parsed: SearchResponseBody = response
            .json()
            .await
            .context("failed to decode Meilisearch response")?;

        tracing::debug!(
            query,
            fetched = parsed.hits.len(),
            "meilisearch query completed"
        );

        let mut hits: Vec<Hit> = parsed
            .hits
            .into_iter()
            .map(|raw| raw.into_hit(context))
            .collect();

        if let Some(filter) = source_filter {
            let needle = filter.to_lowercase();
            hits.retain(|hit| hit.source.to_lowercase().contains(&needle));
        }
        hits.truncate(limit);

        Ok(hits)
    }

    async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.host);
        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .with_context(|| format!("health request to {url} failed"))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let parsed: HealthResponseBody = response
            .json()
            .await
            .context("failed to decode Meilisearch health response")?;
        Ok(parsed.status == "available")
    }
}
