//! Error types for the osslex query-expansion engine.
//!
//! The engine distinguishes a small closed set of failures:
//!
//! - **InvalidQuery**: the caller supplied an empty or whitespace-only
//!   query; rejected before any expansion work happens.
//! - **AmbiguousMapping**: two grapheme entries collide at table load.
//!   This is a configuration defect and is fatal at startup; it can
//!   never surface at query time.
//! - **SearchUnavailable**: every dispatched candidate search failed,
//!   so there is nothing to merge. Partial failure is *not* an error;
//!   missing contributions degrade to empty hit lists and are logged.
//! - **InvalidConfig**: malformed static tables (duplicate special-case
//!   keys, empty grapheme sources, and the like).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LexiconError>;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("query is empty or whitespace-only")]
    InvalidQuery,

    #[error(
        "ambiguous grapheme mapping: {sequence:?} is defined more than once for {direction} at priority {priority}"
    )]
    AmbiguousMapping {
        sequence: String,
        direction: String,
        priority: i32,
    },

    #[error("search backend unavailable: all {attempted} candidate searches failed")]
    SearchUnavailable { attempted: usize },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl LexiconError {
    /// True when the failure was caused by caller input rather than the
    /// engine or its configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(self, LexiconError::InvalidQuery)
    }

    /// True when the failure indicates a broken static configuration,
    /// which should abort startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LexiconError::AmbiguousMapping { .. }
                | LexiconError::InvalidConfig(_)
                | LexiconError::ConfigParse(_)
        )
    }
}
