pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod service;
pub mod translit;

pub use service::{LexiconService, SearchOutput, SearchRequest};
