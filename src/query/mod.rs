//! # Query Module
//!
//! Turns one raw query into a bounded, ordered candidate set and merges
//! the per-candidate search results back into a single ranked list.
//!
//! ## Key Components
//!
//! - [`candidate`] - candidate value types and origin priorities
//! - [`planner`] - query expansion (original, special cases, script
//!   conversions, typo variants)
//! - [`aggregate`] - concurrent candidate fan-out and hit merging

pub mod aggregate;
pub mod candidate;
pub mod planner;

pub use aggregate::{AggregateOptions, MergedHit, ResultAggregator};
pub use candidate::{Candidate, Origin};
pub use planner::QueryExpansionPlanner;
