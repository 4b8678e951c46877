//! Paper collector entry point.
//!
//! Two subcommands: `collect` runs the full pipeline and writes the report,
//! `enrich` backfills missing abstracts in an existing report.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_collector::config::{CollectionConfig, HttpConfig, MergeStrategy};
use paper_collector::pipeline::{CollectMode, Collector, Enricher};
use paper_collector::providers::{CrossrefProvider, SemanticScholarProvider};
use paper_collector::{HttpClient, report};

#[derive(Parser, Debug)]
#[command(name = "paper-collector")]
#[command(about = "Collects, deduplicates and ranks academic paper metadata")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a collection and write the report
    Collect {
        /// Directory containing keywords.json and trusted_sources.json
        #[arg(long, default_value = "config")]
        config_dir: PathBuf,

        /// Report output path
        #[arg(long, default_value = "content/01-papers-raw.json")]
        output: PathBuf,

        /// Provider combination
        #[arg(long, value_enum, default_value = "standard")]
        mode: CollectMode,

        /// Size of the final selection (default 50)
        #[arg(long)]
        limit: Option<usize>,

        /// Merge behavior for repeat sightings of the same DOI
        #[arg(long, value_enum, default_value = "keep-first")]
        merge_strategy: MergeStrategy,

        /// Semantic Scholar API key (optional, raises rate limits)
        #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
        api_key: Option<String>,
    },

    /// Backfill missing abstracts in an existing report, in place
    Enrich {
        /// Report file produced by `collect`
        #[arg(long, default_value = "content/01-papers-raw.json")]
        report: PathBuf,

        /// Semantic Scholar API key (optional, raises rate limits)
        #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
        api_key: Option<String>,
    },
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

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting paper collector");

    match cli.command {
        Command::Collect { config_dir, output, mode, limit, merge_strategy, api_key } => {
            collect(&config_dir, &output, mode, limit, merge_strategy, api_key).await
        }
        Command::Enrich { report, api_key } => enrich(&report, api_key).await,
    }
}

async fn collect(
    config_dir: &Path,
    output: &Path,
    mode: CollectMode,
    limit: Option<usize>,
    merge_strategy: MergeStrategy,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let mut collection = CollectionConfig::load(config_dir)?;
    if let Some(limit) = limit {
        collection.selection_limit = limit;
    }
    collection.merge_strategy = merge_strategy;

    let http_config = HttpConfig::new(api_key);
    let collector = Collector::new(&http_config, collection)?;

    let report_doc = collector.run(mode).await;
    report::save(&report_doc, output)?;

    Ok(())
}

async fn enrich(report_path: &Path, api_key: Option<String>) -> anyhow::Result<()> {
    let mut doc = report::load(report_path)?;

    let missing = doc.papers.iter().filter(|p| !p.paper.has_summary()).count();
    tracing::info!(missing, total = doc.papers.len(), "abstract backfill started");

    if missing == 0 {
        tracing::info!("nothing to backfill");
        return Ok(());
    }

    let http_config = HttpConfig::new(api_key);
    let http = HttpClient::new(&http_config)?;
    let crossref = CrossrefProvider::new(http.clone(), &http_config);
    let semantic_scholar = SemanticScholarProvider::new(http, &http_config);

    // Crossref first, Semantic Scholar as the fallback.
    let enricher = Enricher::new(vec![&crossref, &semantic_scholar]);
    let filled =
        enricher.enrich_all(doc.papers.iter_mut().map(|p| &mut p.paper), None).await;

    for (source, count) in &filled {
        tracing::info!(source = %source, count, "abstracts filled");
    }

    let still_missing = doc.papers.iter().filter(|p| !p.paper.has_summary()).count();
    tracing::info!(
        filled = filled.values().sum::<usize>(),
        still_missing,
        "abstract backfill complete"
    );

    report::save(&doc, report_path)?;
    Ok(())
}
