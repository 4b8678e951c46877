//! Provider adapters.
//!
//! Each adapter translates one external API's records into `NormalizedPaper`
//! or rejects them against the configured `RecordFilter`. Search calls degrade
//! to an empty result on any failure; lookups degrade to `None`. Nothing here
//! can abort a run.

mod crossref;
mod openalex;
mod semantic_scholar;

pub use crossref::CrossrefProvider;
pub use openalex::OpenAlexProvider;
pub use semantic_scholar::SemanticScholarProvider;

use url::Url;

use crate::config::RecordFilter;
use crate::models::{NormalizedPaper, SourceApi};

/// A provider exposing a keyword-search endpoint.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provenance tag for records this provider produces.
    fn source(&self) -> SourceApi;

    /// Search by keyword and normalize the results.
    ///
    /// Records failing the filter are dropped; a failed call (including an
    /// exhausted retry budget) returns an empty vec and is logged, never
    /// propagated.
    async fn search(&self, keyword: &str, filter: &RecordFilter) -> Vec<NormalizedPaper>;
}

/// A provider exposing an identifier-lookup endpoint usable for abstract
/// backfill.
#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Provenance tag for fills from this provider.
    fn source(&self) -> SourceApi;

    /// Fetch the abstract for an identifier.
    ///
    /// `None` on not-found, missing abstract, or any transport failure.
    async fn summary_by_id(&self, identifier: &str) -> Option<String>;
}

/// Canonicalize a raw identifier: strip any URL prefix, lowercase.
///
/// Returns `None` for blank input or an unparseable URL.
pub(crate) fn normalize_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let bare = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        let url = Url::parse(trimmed).ok()?;
        url.path().trim_start_matches('/').to_string()
    } else {
        trimmed.to_string()
    };

    if bare.is_empty() { None } else { Some(bare.to_ascii_lowercase()) }
}
