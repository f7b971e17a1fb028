//! # Index Module
//!
//! The seam to the external full-text index. The engine only ever
//! issues pure reads: [`SearchIndex::search`] must be deterministic for
//! a fixed index snapshot and must not mutate index state.
//!
//! ## Key Components
//!
//! - [`SearchIndex`] - object-safe async collaborator trait
//! - [`Hit`] - one entry returned by the index
//! - [`meili`] - the production Meilisearch HTTP client

pub mod meili;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use meili::MeiliIndex;

/// How much surrounding dictionary context to retrieve with each hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSize {
    /// Term, definition and source only.
    #[default]
    Default,
    /// Include the expanded context window around the entry.
    Expanded,
    /// Include the full surrounding dictionary section.
    Full,
}

impl ContextSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextSize::Default => "default",
            ContextSize::Expanded => "expanded",
            ContextSize::Full => "full",
        }
    }
}

impl fmt::Display for ContextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ContextSize::Default),
            "expanded" => Ok(ContextSize::Expanded),
            "full" => Ok(ContextSize::Full),
            other => Err(format!(
                "unknown context size {other:?} (expected default, expanded or full)"
            )),
        }
    }
}

/// One entry returned by the full-text index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Stable document identifier, the merge key across candidates.
    pub id: String,
    /// The headword.
    pub term: String,
    /// The definition text.
    pub definition: String,
    /// Normalized relevance score in [0, 1].
    pub score: f64,
    /// Dictionary source the entry came from.
    pub source: String,
    /// Surrounding context, present for non-default [`ContextSize`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_context: Option<String>,
}

/// Read-only full-text search collaborator.
///
/// Implementations must be safe for concurrent use: the aggregator
/// dispatches one call per candidate without synchronization.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Search the index for `query`, returning at most `limit` hits in
    /// descending relevance order.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        source_filter: Option<&str>,
        context: ContextSize,
    ) -> Result<Vec<Hit>>;

    /// Whether the backing index is reachable and serving.
    async fn health(&self) -> Result<bool>;
}
