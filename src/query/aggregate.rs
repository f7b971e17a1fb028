//! Candidate fan-out and hit merging.
//!
//! One search per candidate is dispatched concurrently against the
//! external index; the aggregator waits for every call to settle (a
//! join barrier), then merges the collected hit lists single-threaded.
//! No shared mutable state is touched during the fan-out, so the whole
//! request stays lock-free.
//!
//! A failing or timed-out candidate search never aborts the request:
//! its contribution degrades to an empty hit list and is logged. Only
//! when *every* candidate fails does the request surface
//! `SearchUnavailable`. Dropping the returned future cancels all
//! outstanding calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_PER_SOURCE_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_TIMEOUT_SECS, MAX_FETCH_LIMIT,
};
use crate::error::{LexiconError, Result};
use crate::index::{ContextSize, Hit, SearchIndex};
use crate::query::candidate::{Candidate, Origin};

/// Limits and knobs for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Hits requested from the index per candidate.
    pub per_candidate_limit: usize,
    /// Cap on the merged result list.
    pub total_limit: usize,
    /// Optional cap on hits sharing one dictionary source.
    pub per_source_limit: Option<usize>,
    /// Optional dictionary source filter, passed to the index.
    pub source_filter: Option<String>,
    /// Context window retrieved with each hit.
    pub context: ContextSize,
    /// Per-candidate search timeout.
    pub search_timeout: Duration,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            per_candidate_limit: MAX_FETCH_LIMIT,
            total_limit: DEFAULT_SEARCH_LIMIT,
            per_source_limit: Some(DEFAULT_PER_SOURCE_LIMIT),
            source_filter: None,
            context: ContextSize::Default,
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
        }
    }
}

/// A deduplicated hit with every origin that produced it. The embedded
/// hit carries the maximum score observed across contributing
/// candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedHit {
    #[serde(flatten)]
    pub hit: Hit,
    pub origins: Vec<Origin>,
}

struct MergeSlot {
    hit: Hit,
    origins: Vec<Origin>,
    best_priority: u8,
    first_seen: usize,
}

/// Issues one search per candidate and merges the results.
#[derive(Clone)]
pub struct ResultAggregator {
    index: Arc<dyn SearchIndex>,
}

impl ResultAggregator {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// Fan out, join, merge, rank and truncate.
    ///
    /// Ordering of the merged list: descending score, ties broken by
    /// the highest-priority contributing origin, then by first-seen
    /// candidate order. `total_limit` applies before the per-source
    /// truncation.
    pub async fn aggregate(
        &self,
        candidates: &[Candidate],
        options: &AggregateOptions,
    ) -> Result<Vec<MergedHit>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let searches = candidates.iter().map(|candidate| {
            let index = Arc::clone(&self.index);
            async move {
                let outcome = tokio::time::timeout(
                    options.search_timeout,
                    index.search(
                        &candidate.text,
                        options.per_candidate_limit,
                        options.source_filter.as_deref(),
                        options.context,
                    ),
                )
                .await;

                match outcome {
                    Ok(Ok(hits)) => Some(hits),
                    Ok(Err(error)) => {
                        tracing::warn!(
                            candidate = %candidate.text,
                            %error,
                            "candidate search failed; contributing empty hit list"
                        );
                        None
                    }
                    Err(_) => {
                        tracing::warn!(
                            candidate = %candidate.text,
                            timeout_ms = options.search_timeout.as_millis() as u64,
                            "candidate search timed out; contributing empty hit list"
                        );
                        None
                    }
                }
            }
        });

        // Join barrier: collection happens before any merging, so the
        // reduction below needs no synchronization.
        let outcomes = join_all(searches).await;

        if outcomes.iter().all(Option::is_none) {
            return Err(LexiconError::SearchUnavailable {
                attempted: candidates.len(),
            });
        }

        let mut slots: Vec<MergeSlot> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for (candidate, outcome) in candidates.iter().zip(outcomes) {
            let Some(hits) = outcome else { continue };
            for hit in hits {
                merge_hit(&mut slots, &mut by_id, hit, candidate.origin);
            }
        }

        slots.sort_by(|a, b| {
            b.hit
                .score
                .total_cmp(&a.hit.score)
                .then_with(|| b.best_priority.cmp(&a.best_priority))
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        slots.truncate(options.total_limit);

        if let Some(per_source) = options.per_source_limit {
            let mut per_source_counts: HashMap<String, usize> = HashMap::new();
            slots.retain(|slot| {
                let count = per_source_counts
                    .entry(slot.hit.source.clone())
                    .or_insert(0);
                *count += 1;
                *count <= per_source
            });
        }

        Ok(slots
            .into_iter()
            .map(|slot| MergedHit {
                hit: slot.hit,
                origins: slot.origins,
            })
            .collect())
    }
}

fn merge_hit(
    slots: &mut Vec<MergeSlot>,
    by_id: &mut HashMap<String, usize>,
    hit: Hit,
    origin: Origin,
) {
    match by_id.get(&hit.id) {
        Some(&idx) => {
            let slot = &mut slots[idx];
            if hit.score > slot.hit.score {
                slot.hit = hit;
            }
            if !slot.origins.contains(&origin) {
                slot.origins.push(origin);
            }
            slot.best_priority = slot.best_priority.max(origin.priority());
        }
        None => {
            by_id.insert(hit.id.clone(), slots.len());
            slots.push(MergeSlot {
                best_priority: origin.priority(),
                first_seen: slots.len(),
                origins: vec![origin],
                hit,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashSet;

    fn hit(id: &str, score: f64, source: &str) -> Hit {
        Hit {
            id: id.to_string(),
            term: format!("term-{id}"),
            definition: format!("definition of {id}"),
            score,
            source: source.to_string(),
            expanded_context: None,
        }
    }

    /// In-memory index double keyed by query text.
    #[derive(Default)]
    struct StaticIndex {
        responses: HashMap<String, Vec<Hit>>,
        fail_on: HashSet<String>,
    }

    impl StaticIndex {
        fn with(mut self, query: &str, hits: Vec<Hit>) -> Self {
            self.responses.insert(query.to_string(), hits);
            self
        }

        fn failing_on(mut self, query: &str) -> Self {
            self.fail_on.insert(query.to_string());
            self
        }
    }

    #[async_trait]
    impl SearchIndex for StaticIndex {
        async fn search(
            &self,
            query: &str,
            limit: usize,
            _source_filter: Option<&str>,
            _context: ContextSize,
        ) -> anyhow::Result<Vec<Hit>> {
            if self.fail_on.contains(query) {
                return Err(anyhow!("simulated backend failure"));
            }
            let mut hits = self.responses.get(query).cloned().unwrap_or_default();
            hits.truncate(limit);
            Ok(hits)
        }

        async fn health(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("тæрхъус", Origin::SpecialCase),
            Candidate::new("tærqūs", Origin::Original),
            Candidate::new("tærqus", Origin::TypoVariant),
        ]
    }

    #[tokio::test]
    async fn test_duplicate_document_keeps_max_score() {
        let index = StaticIndex::default()
            .with("тæрхъус", vec![hit("D", 0.5, "abaev")])
            .with("tærqūs", vec![hit("D", 0.9, "abaev")]);
        let aggregator = ResultAggregator::new(Arc::new(index));

        let merged = aggregator
            .aggregate(&candidates(), &AggregateOptions::default())
            .await
            .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].hit.id, "D");
        assert_eq!(merged[0].hit.score, 0.9);
        assert_eq!(
            merged[0].origins,
            vec![Origin::SpecialCase, Origin::Original]
        );
    }

    #[tokio::test]
    async fn test_descending_score_order() {
        let index = StaticIndex::default()
            .with("тæрхъус", vec![hit("a", 0.4, "abaev"), hit("b", 0.8, "abaev")])
            .with("tærqūs", vec![hit("c", 0.6, "miller")]);
        let aggregator = ResultAggregator::new(Arc::new(index));

        let merged = aggregator
            .aggregate(&candidates(), &AggregateOptions::default())
            .await
            .unwrap();

        let ids: Vec<&str> = merged.iter().map(|m| m.hit.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_score_tie_broken_by_origin_priority() {
        // Same score, different contributing origins: the special-case
        // hit ranks first even though the original-candidate hit was
        // collected earlier.
        let index = StaticIndex::default()
            .with("tærqūs", vec![hit("orig", 0.7, "abaev")])
            .with("тæрхъус", vec![hit("special", 0.7, "abaev")]);
        let aggregator = ResultAggregator::new(Arc::new(index));

        let ordered = vec![
            Candidate::new("tærqūs", Origin::Original),
            Candidate::new("тæрхъус", Origin::SpecialCase),
        ];
        let merged = aggregator
            .aggregate(&ordered, &AggregateOptions::default())
            .await
            .unwrap();

        let ids: Vec<&str> = merged.iter().map(|m| m.hit.id.as_str()).collect();
        assert_eq!(ids, vec!["special", "orig"]);
    }

    #[tokio::test]
    async fn test_total_limit_applied() {
        let hits: Vec<Hit> = (0..10).map(|i| hit(&format!("d{i}"), 0.5, "abaev")).collect();
        let index = StaticIndex::default().with("тæрхъус", hits);
        let aggregator = ResultAggregator::new(Arc::new(index));

        let options = AggregateOptions {
            total_limit: 4,
            per_source_limit: None,
            ..AggregateOptions::default()
        };
        let merged = aggregator
            .aggregate(&candidates(), &options)
            .await
            .unwrap();
        assert_eq!(merged.len(), 4);
    }

    #[tokio::test]
    async fn test_per_source_limit_applied() {
        let index = StaticIndex::default().with(
            "тæрхъус",
            vec![
                hit("a1", 0.9, "abaev"),
                hit("a2", 0.8, "abaev"),
                hit("a3", 0.7, "abaev"),
                hit("m1", 0.6, "miller"),
            ],
        );
        let aggregator = ResultAggregator::new(Arc::new(index));

        let options = AggregateOptions {
            per_source_limit: Some(2),
            ..AggregateOptions::default()
        };
        let merged = aggregator
            .aggregate(&candidates(), &options)
            .await
            .unwrap();

        let abaev_count = merged.iter().filter(|m| m.hit.source == "abaev").count();
        assert_eq!(abaev_count, 2);
        assert!(merged.iter().any(|m| m.hit.source == "miller"));
        // score order preserved after re-flattening
        let scores: Vec<f64> = merged.iter().map(|m| m.hit.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_partial_failure_recovered() {
        let index = StaticIndex::default()
            .with("тæрхъус", vec![hit("a", 0.9, "abaev")])
            .failing_on("tærqūs")
            .failing_on("tærqus");
        let aggregator = ResultAggregator::new(Arc::new(index));

        let merged = aggregator
            .aggregate(&candidates(), &AggregateOptions::default())
            .await
            .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].hit.id, "a");
    }

    #[tokio::test]
    async fn test_all_failures_surface_search_unavailable() {
        let index = StaticIndex::default()
            .failing_on("тæрхъус")
            .failing_on("tærqūs")
            .failing_on("tærqus");
        let aggregator = ResultAggregator::new(Arc::new(index));

        let result = aggregator
            .aggregate(&candidates(), &AggregateOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(LexiconError::SearchUnavailable { attempted: 3 })
        ));
    }

    #[tokio::test]
    async fn test_empty_candidate_list_yields_empty_result() {
        let aggregator = ResultAggregator::new(Arc::new(StaticIndex::default()));
        let merged = aggregator
            .aggregate(&[], &AggregateOptions::default())
            .await
            .unwrap();
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn test_candidates_with_no_hits_contribute_nothing() {
        let index = StaticIndex::default().with("тæрхъус", vec![hit("a", 0.9, "abaev")]);
        let aggregator = ResultAggregator::new(Arc::new(index));

        // two of three candidates return empty lists, not errors
        let merged = aggregator
            .aggregate(&candidates(), &AggregateOptions::default())
            .await
            .unwrap();
        assert_eq!(merged.len(), 1);
    }
}
