use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use osslex::config::{
    BackendConfig, DEFAULT_CANDIDATE_CAPACITY, DEFAULT_PER_SOURCE_LIMIT, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SEARCH_TIMEOUT_SECS, EngineConfig,
};
use osslex::index::ContextSize;
use osslex::{LexiconService, SearchRequest};

/// Bi-script Ossetian dictionary search over a Meilisearch index
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional TOML file overriding the built-in linguistic tables
    #[arg(long, env = "OSSLEX_TABLES")]
    tables: Option<PathBuf>,

    /// Meilisearch host
    #[arg(long, env = "MEILISEARCH_HOST", default_value = "http://localhost:7700")]
    host: String,

    /// Meilisearch API key
    #[arg(long, env = "MEILISEARCH_API_KEY")]
    api_key: Option<String>,

    /// Meilisearch index uid
    #[arg(long, env = "MEILISEARCH_INDEX_NAME", default_value = "dictionary")]
    index: String,

    /// Per-candidate search timeout in seconds
    #[arg(long, default_value_t = DEFAULT_SEARCH_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the expanded candidate set for a query without searching
    Expand {
        query: String,
        /// Disable script conversion and variant generation
        #[arg(long)]
        no_transliteration: bool,
        /// Cap on expanded candidates
        #[arg(long, default_value_t = DEFAULT_CANDIDATE_CAPACITY)]
        capacity: usize,
    },
    /// Search the dictionary index
    Search {
        query: String,
        /// Maximum number of merged hits
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        /// Maximum hits per dictionary source (0 disables the cap)
        #[arg(long, default_value_t = DEFAULT_PER_SOURCE_LIMIT)]
        per_source: usize,
        /// Disable script conversion and variant generation
        #[arg(long)]
        no_transliteration: bool,
        /// Context window: default, expanded or full
        #[arg(long, default_value = "default")]
        context: ContextSize,
        /// Restrict hits to dictionary sources containing this string
        #[arg(long)]
        source: Option<String>,
    },
    /// Check whether the search backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let engine = match &args.tables {
        Some(path) => {
            tracing::info!("loading linguistic tables from {}", path.display());
            EngineConfig::from_path(path)?
        }
        None => EngineConfig::builtin(),
    };

    let backend = BackendConfig {
        host: args.host.clone(),
        api_key: args.api_key.clone(),
        index_uid: args.index.clone(),
        timeout_secs: args.timeout,
    };

    let service = LexiconService::new(&engine, &backend)?;

    match args.command {
        Commands::Expand {
            query,
            no_transliteration,
            capacity,
        } => {
            let candidates = service.expand_query(&query, !no_transliteration, capacity)?;
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        Commands::Search {
            query,
            limit,
            per_source,
            no_transliteration,
            context,
            source,
        } => {
            let request = SearchRequest {
                limit,
                per_source_limit: (per_source > 0).then_some(per_source),
                transliteration: !no_transliteration,
                context,
                source,
                ..SearchRequest::new(query)
            };
            let output = service.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Health => {
            let healthy = service.health().await;
            println!(
                "{}",
                serde_json::json!({ "backend": backend.host, "healthy": healthy })
            );
            if !healthy {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
