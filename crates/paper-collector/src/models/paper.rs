//! Normalized paper record shared by every provider adapter.

use serde::{Deserialize, Serialize};

/// Which provider first produced a record.
///
/// Provenance only: never overwritten when later sightings merge in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceApi {
    /// Semantic Scholar Graph API.
    #[serde(rename = "semantic_scholar")]
    SemanticScholar,

    /// OpenAlex works API.
    #[serde(rename = "openalex")]
    OpenAlex,

    /// Crossref REST API.
    #[serde(rename = "crossref")]
    Crossref,
}

impl SourceApi {
    /// Wire/display name of the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SemanticScholar => "semantic_scholar",
            Self::OpenAlex => "openalex",
            Self::Crossref => "crossref",
        }
    }
}

impl std::fmt::Display for SourceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paper record after adapter normalization.
///
/// Exactly one of these exists per distinct identifier in the accumulator.
/// Wire names follow the output document of the collector (`journal`, `doi`,
/// `abstract`, ...), field names follow what they mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPaper {
    /// Paper title; never empty.
    pub title: String,

    /// Author display names in provider order.
    pub authors: Vec<String>,

    /// Publication year; always inside the configured range.
    pub year: i32,

    /// Publication venue, possibly empty.
    #[serde(rename = "journal")]
    pub venue: String,

    /// Canonical lowercase DOI; the dedupe key.
    #[serde(rename = "doi")]
    pub identifier: String,

    /// Citation count; non-negative, at least the configured minimum.
    pub citation_count: i64,

    /// Abstract text, possibly empty; may be back-filled by enrichment.
    #[serde(rename = "abstract")]
    pub summary: String,

    /// Publication type; `"article"` when the provider omits it.
    pub publication_type: String,

    /// Keywords whose searches sighted this record. Append-only, no
    /// duplicates, insertion order preserved.
    #[serde(rename = "keywords_matched")]
    pub matched_keywords: Vec<String>,

    /// Provider that first produced the record.
    #[serde(rename = "source_api")]
    pub source: SourceApi,

    /// Provider URL or a `https://doi.org/` link, possibly empty.
    pub url: String,

    /// Whether `venue` is in the configured trusted set.
    #[serde(rename = "is_trusted_journal")]
    pub is_trusted_venue: bool,
}

impl NormalizedPaper {
    /// Whether the record carries a non-blank abstract.
    #[must_use]
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }

    /// Append a matched keyword unless it is already recorded.
    pub fn add_keyword(&mut self, keyword: &str) {
        if !self.matched_keywords.iter().any(|k| k == keyword) {
            self.matched_keywords.push(keyword.to_string());
        }
    }
}
