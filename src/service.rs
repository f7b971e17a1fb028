//! Service façade wiring the expansion planner, the aggregator and the
//! search backend together. This is the surface the (out-of-scope) web
//! layer talks to: expansion and aggregation stay independently
//! callable, `search` runs the whole pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::{
    BackendConfig, DEFAULT_CANDIDATE_CAPACITY, DEFAULT_PER_SOURCE_LIMIT, DEFAULT_SEARCH_LIMIT,
    EngineConfig, MAX_FETCH_LIMIT,
};
use crate::error::Result;
use crate::index::{ContextSize, MeiliIndex, SearchIndex};
use crate::query::{
    AggregateOptions, Candidate, MergedHit, QueryExpansionPlanner, ResultAggregator,
};

/// One dictionary search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Cap on merged hits returned.
    pub limit: usize,
    /// Cap on hits per dictionary source.
    pub per_source_limit: Option<usize>,
    /// Whether to expand the query across scripts.
    pub transliteration: bool,
    /// Cap on expanded candidate queries.
    pub capacity: usize,
    /// Context window retrieved with each hit.
    pub context: ContextSize,
    /// Restrict hits to dictionary sources containing this string.
    pub source: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            per_source_limit: Some(DEFAULT_PER_SOURCE_LIMIT),
            transliteration: true,
            capacity: DEFAULT_CANDIDATE_CAPACITY,
            context: ContextSize::Default,
            source: None,
        }
    }
}

/// Ranked, deduplicated response for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_hits: usize,
    pub processing_time_ms: u64,
    pub context_size: ContextSize,
    pub hits: Vec<MergedHit>,
}

/// The transliteration-aware dictionary search service.
#[derive(Clone)]
pub struct LexiconService {
    planner: QueryExpansionPlanner,
    aggregator: ResultAggregator,
    index: Arc<dyn SearchIndex>,
    search_timeout: Duration,
}

impl LexiconService {
    /// Build the service against a Meilisearch backend.
    pub fn new(config: &EngineConfig, backend: &BackendConfig) -> anyhow::Result<Self> {
        let index: Arc<dyn SearchIndex> = Arc::new(MeiliIndex::new(backend)?);
        Ok(Self::with_index(
            config,
            index,
            Duration::from_secs(backend.timeout_secs),
        )?)
    }

    /// Build the service against an arbitrary index implementation.
    pub fn with_index(
        config: &EngineConfig,
        index: Arc<dyn SearchIndex>,
        search_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            planner: QueryExpansionPlanner::new(config)?,
            aggregator: ResultAggregator::new(Arc::clone(&index)),
            index,
            search_timeout,
        })
    }

    /// Expand a query into its candidate set without searching.
    pub fn expand_query(
        &self,
        query: &str,
        transliteration_enabled: bool,
        capacity: usize,
    ) -> Result<Vec<Candidate>> {
        self.planner.expand(query, transliteration_enabled, capacity)
    }

    /// Run the full pipeline: expand, fan out, merge, rank.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutput> {
        let started = Instant::now();

        let candidates =
            self.expand_query(&request.query, request.transliteration, request.capacity)?;
        tracing::debug!(
            query = %request.query,
            candidates = candidates.len(),
            "query expanded"
        );

        let options = AggregateOptions {
            // Over-fetch per candidate so merging and per-source
            // trimming still fill the requested limit.
            per_candidate_limit: request.limit.saturating_mul(2).min(MAX_FETCH_LIMIT),
            total_limit: request.limit,
            per_source_limit: request.per_source_limit,
            source_filter: request.source.clone(),
            context: request.context,
            search_timeout: self.search_timeout,
        };

        let hits = self.aggregator.aggregate(&candidates, &options).await?;

        let output = SearchOutput {
            query: request.query.clone(),
            total_hits: hits.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            context_size: request.context,
            hits,
        };
        tracing::info!(
            query = %request.query,
            hits = output.total_hits,
            elapsed_ms = output.processing_time_ms,
            "search completed"
        );
        Ok(output)
    }

    /// Whether the search backend is reachable and serving.
    pub async fn health(&self) -> bool {
        match self.index.health().await {
            Ok(healthy) => healthy,
            Err(error) => {
                tracing::warn!(%error, "backend health check failed");
                false
            }
        }
    }
}
