//! Publication Sync - Entry Point
//!
//! `refresh` (the default) rebuilds the cache from Semantic Scholar;
//! `resolve-dois` fills in missing DOIs from Crossref.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use publication_sync::config::defaults;
use publication_sync::{
    AuthorLocator, CacheStore, Config, CrossrefClient, IdentifierResolver, Pipeline, RateGate,
    RecordMerger, RefreshOutcome, SemanticScholarClient, SemanticScholarFetcher, merger,
    resolve_cached,
};

#[derive(Parser, Debug)]
#[command(name = "publication-sync")]
#[command(about = "Build the cached publication list from Semantic Scholar and Crossref")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Cache document path
    #[arg(long, default_value = defaults::CACHE_PATH, env = "PUBLICATIONS_CACHE_PATH")]
    cache_path: PathBuf,

    /// Curated entries (JSON array); missing file means none
    #[arg(long, default_value = defaults::CURATED_PATH, env = "PUBLICATIONS_CURATED_PATH")]
    curated_path: PathBuf,

    /// Semantic Scholar author ID
    #[arg(long, default_value = defaults::AUTHOR_ID, env = "SEMANTIC_SCHOLAR_AUTHOR_ID")]
    author_id: String,

    /// Locate the author by ORCID instead of author ID
    #[arg(long, env = "AUTHOR_ORCID")]
    orcid: Option<String>,

    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Author surname passed to Crossref title search
    #[arg(long, default_value = defaults::AUTHOR_HINT, env = "CROSSREF_AUTHOR_HINT")]
    author_hint: String,

    /// Contact email for Crossref's polite pool
    #[arg(long, env = "CROSSREF_MAILTO")]
    mailto: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Fetch publications and rewrite the cache (falls back to the existing cache)
    #[default]
    Refresh,
    /// Look up missing DOIs for the cached publications
    ResolveDois,
}

impl Cli {
    fn config(&self) -> Config {
        let author = match self.orcid.as_deref().map(str::trim) {
            Some(orcid) if !orcid.is_empty() => AuthorLocator::Orcid(orcid.to_string()),
            _ => AuthorLocator::SemanticScholar(self.author_id.clone()),
        };

        let mut config = Config::new(author, self.api_key.clone());
        config.cache_path.clone_from(&self.cache_path);
        config.curated_path.clone_from(&self.curated_path);
        config.author_hint = Some(self.author_hint.clone()).filter(|h| !h.trim().is_empty());
        config.crossref_mailto.clone_from(&self.mailto);
        config
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let command = cli.command.unwrap_or_default();
    let config = cli.config();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?command,
        cache = %config.cache_path.display(),
        "Starting publication sync"
    );

    let store = CacheStore::new(&config.cache_path);
    let merger = RecordMerger::new(merger::load_curated(&config.curated_path)?);

    match command {
        Command::Refresh => {
            let client = SemanticScholarClient::new(&config)?;
            let fetcher = SemanticScholarFetcher::new(client, config.author.clone());
            let outcome = Pipeline::new(fetcher, merger, store).refresh().await?;

            let label = match &outcome {
                RefreshOutcome::Refreshed(_) => "refreshed",
                RefreshOutcome::StaleFallback(_) => "stale-fallback",
                RefreshOutcome::Bootstrapped(_) => "bootstrapped",
            };
            tracing::info!(outcome = label, count = outcome.document().count(), "Refresh finished");
        }
        Command::ResolveDois => {
            let lookup = CrossrefClient::new(&config)?;
            let resolver = IdentifierResolver::new(lookup, RateGate::new(config.lookup_interval))
                .with_skip_ids(merger.curated_ids());

            if let Some(report) = resolve_cached(&store, &resolver).await? {
                tracing::info!(
                    found = report.with_doi(),
                    looked_up = report.lookups(),
                    total = report.total,
                    "DOI resolution finished"
                );
            }
        }
    }

    Ok(())
}
