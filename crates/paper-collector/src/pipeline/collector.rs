//! Collection run orchestration.

use crate::client::HttpClient;
use crate::config::{CollectionConfig, HttpConfig};
use crate::models::{RunReport, SourceApi};
use crate::providers::{
    CrossrefProvider, OpenAlexProvider, SearchProvider, SemanticScholarProvider,
};
use crate::report;

use super::{Accumulator, Enricher, select};

/// Which provider combination a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CollectMode {
    /// Semantic Scholar primary, OpenAlex supplement, abstract backfill.
    #[default]
    Standard,

    /// Crossref primary (abstract-bearing works only), Semantic Scholar
    /// supplement with the abstract required; no backfill pass.
    SummaryFirst,
}

/// Runs the whole search/accumulate/enrich/select pipeline, strictly
/// sequentially, holding all state for the duration of one run.
pub struct Collector {
    config: CollectionConfig,
    http: HttpClient,
    semantic_scholar: SemanticScholarProvider,
    openalex: OpenAlexProvider,
    crossref: CrossrefProvider,
}

impl Collector {
    /// Build a collector and its provider adapters.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(http_config: &HttpConfig, config: CollectionConfig) -> anyhow::Result<Self> {
        let http = HttpClient::new(http_config)?;
        Ok(Self {
            semantic_scholar: SemanticScholarProvider::new(http.clone(), http_config),
            openalex: OpenAlexProvider::new(http.clone(), http_config),
            crossref: CrossrefProvider::new(http.clone(), http_config),
            http,
            config,
        })
    }

    /// Execute a collection run and produce the report document.
    ///
    /// Provider failures degrade to empty results; the worst outcome of total
    /// provider failure is an undersized (possibly empty) selection.
    pub async fn run(&self, mode: CollectMode) -> RunReport {
        let mut accumulator = Accumulator::new(self.config.merge_strategy);

        tracing::info!(
            ?mode,
            primary_keywords = self.config.primary_keywords.len(),
            secondary_keywords = self.config.secondary_keywords.len(),
            minimum_citations = self.config.minimum_citation_count,
            "collection started"
        );

        let sources = match mode {
            CollectMode::Standard => self.run_standard(&mut accumulator).await,
            CollectMode::SummaryFirst => self.run_summary_first(&mut accumulator).await,
        };

        let selected = select(&accumulator, self.config.selection_limit);
        self.log_selection(&selected);

        report::build(
            selected,
            sources,
            self.config.all_keywords(),
            self.http.request_count(),
        )
    }

    /// Semantic Scholar primary, OpenAlex supplement, then abstract backfill
    /// for OpenAlex-sourced records.
    async fn run_standard(&self, accumulator: &mut Accumulator) -> Vec<SourceApi> {
        let filter = self.config.record_filter(false);
        let target = self.config.selection_limit;

        tracing::info!("phase 1: semantic scholar primary search");
        for keyword in &self.config.primary_keywords {
            for paper in self.semantic_scholar.search(keyword, &filter).await {
                accumulator.accept(paper, keyword);
            }
        }
        tracing::info!(accumulated = accumulator.len(), "primary search complete");

        if accumulator.len() < target {
            tracing::info!("phase 2: openalex supplementary search");
            for keyword in &self.config.secondary_keywords {
                if accumulator.len() >= target {
                    break;
                }
                for paper in self.openalex.search(keyword, &filter).await {
                    if accumulator.len() >= target {
                        break;
                    }
                    accumulator.accept(paper, keyword);
                }
            }
            tracing::info!(accumulated = accumulator.len(), "supplementary search complete");
        }

        if accumulator.len() < target {
            let missing = accumulator
                .papers()
                .iter()
                .filter(|p| p.source == SourceApi::OpenAlex && !p.has_summary())
                .count();
            tracing::info!(
                openalex_papers = accumulator.count_by_source(SourceApi::OpenAlex),
                missing_summaries = missing,
                "phase 3: abstract backfill"
            );

            if missing > 0 {
                let enricher = Enricher::new(vec![&self.semantic_scholar]);
                let filled = enricher
                    .enrich_all(accumulator.papers_mut(), Some(SourceApi::OpenAlex))
                    .await;
                tracing::info!(
                    filled = filled.values().sum::<usize>(),
                    "abstract backfill complete"
                );
            }
        }

        vec![SourceApi::SemanticScholar, SourceApi::OpenAlex]
    }

    /// Crossref primary (abstracts guaranteed), Semantic Scholar supplement
    /// with the abstract required.
    async fn run_summary_first(&self, accumulator: &mut Accumulator) -> Vec<SourceApi> {
        let filter = self.config.record_filter(true);
        let target = self.config.selection_limit;

        tracing::info!("phase 1: crossref primary search");
        for keyword in &self.config.primary_keywords {
            for paper in self.crossref.search(keyword, &filter).await {
                accumulator.accept(paper, keyword);
            }
        }
        tracing::info!(accumulated = accumulator.len(), "primary search complete");

        if accumulator.len() < target {
            tracing::info!("phase 2: semantic scholar supplementary search");
            let keywords =
                self.config.primary_keywords.iter().chain(&self.config.secondary_keywords);
            for keyword in keywords {
                if accumulator.len() >= target {
                    break;
                }
                for paper in self.semantic_scholar.search(keyword, &filter).await {
                    if accumulator.len() >= target {
                        break;
                    }
                    accumulator.accept(paper, keyword);
                }
            }
            tracing::info!(accumulated = accumulator.len(), "supplementary search complete");
        }

        vec![SourceApi::Crossref, SourceApi::SemanticScholar]
    }

    fn log_selection(&self, selected: &[crate::models::NormalizedPaper]) {
        let trusted = selected.iter().filter(|p| p.is_trusted_venue).count();
        let with_summary = selected.iter().filter(|p| p.has_summary()).count();
        let mean_citations = if selected.is_empty() {
            0.0
        } else {
            selected.iter().map(|p| p.citation_count).sum::<i64>() as f64 / selected.len() as f64
        };

        tracing::info!(
            selected = selected.len(),
            trusted_venue = trusted,
            with_summary,
            mean_citations,
            total_requests = self.http.request_count(),
            "selection complete"
        );
    }
}
