//! Semantic Scholar adapter: keyword search and DOI lookup.

use serde::Deserialize;

use super::{SearchProvider, SummaryProvider, normalize_identifier};
use crate::client::HttpClient;
use crate::config::{HttpConfig, RecordFilter, RetryPolicy, api, fields};
use crate::models::{NormalizedPaper, SourceApi};

/// A paper as returned by the Graph API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsPaper {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub r#abstract: Option<String>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub venue: Option<String>,

    #[serde(default)]
    pub citation_count: Option<i64>,

    #[serde(default)]
    pub authors: Vec<SsAuthor>,

    #[serde(default)]
    pub external_ids: Option<SsExternalIds>,

    #[serde(default)]
    pub publication_types: Option<Vec<String>>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Author reference within a paper.
#[derive(Debug, Clone, Deserialize)]
pub struct SsAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// External identifiers; only the DOI matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SsExternalIds {
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SsSearchResponse {
    #[serde(default)]
    data: Vec<SsPaper>,
}

/// Semantic Scholar provider.
#[derive(Debug, Clone)]
pub struct SemanticScholarProvider {
    http: HttpClient,
    base_url: String,
    search_policy: RetryPolicy,
    lookup_policy: RetryPolicy,
}

impl SemanticScholarProvider {
    /// Create an adapter from the HTTP layer configuration.
    #[must_use]
    pub fn new(http: HttpClient, config: &HttpConfig) -> Self {
        Self {
            http,
            base_url: config.semantic_scholar_url.clone(),
            search_policy: config.semantic_scholar_search,
            lookup_policy: config.semantic_scholar_lookup,
        }
    }

    /// Normalize a raw paper against the filter, tagging the matching keyword.
    ///
    /// Rejects on: missing title, missing DOI, citation count below the
    /// minimum, year missing or out of range, and (when the filter requires
    /// one) missing abstract.
    #[must_use]
    pub fn normalize(
        paper: &SsPaper,
        filter: &RecordFilter,
        keyword: &str,
    ) -> Option<NormalizedPaper> {
        let title = paper.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }

        let identifier =
            normalize_identifier(paper.external_ids.as_ref()?.doi.as_deref().unwrap_or(""))?;

        let citation_count = paper.citation_count.unwrap_or(0);
        if !filter.accepts_citations(citation_count) {
            return None;
        }

        let year = paper.year?;
        if !filter.accepts_year(year) {
            return None;
        }

        let summary = paper.r#abstract.clone().unwrap_or_default();
        if filter.require_summary && summary.trim().is_empty() {
            return None;
        }

        let venue = paper.venue.clone().unwrap_or_default();

        let publication_type = paper
            .publication_types
            .as_ref()
            .and_then(|types| types.first().cloned())
            .unwrap_or_else(|| "article".to_string());

        Some(NormalizedPaper {
            title: title.to_string(),
            authors: paper
                .authors
                .iter()
                .map(|a| a.name.clone().unwrap_or_else(|| "Unknown".to_string()))
                .collect(),
            year,
            is_trusted_venue: filter.is_trusted(&venue),
            venue,
            identifier,
            citation_count,
            summary,
            publication_type,
            matched_keywords: vec![keyword.to_string()],
            source: SourceApi::SemanticScholar,
            url: paper.url.clone().unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for SemanticScholarProvider {
    fn source(&self) -> SourceApi {
        SourceApi::SemanticScholar
    }

    async fn search(&self, keyword: &str, filter: &RecordFilter) -> Vec<NormalizedPaper> {
        let url = format!("{}/paper/search", self.base_url);
        let params = vec![
            ("query".to_string(), keyword.to_string()),
            ("fields".to_string(), fields::SEARCH.join(",")),
            ("limit".to_string(), api::SEMANTIC_SCHOLAR_PAGE_SIZE.to_string()),
            (
                "year".to_string(),
                format!("{}-{}", filter.year_range.min, filter.year_range.max),
            ),
        ];

        match self.http.get::<SsSearchResponse>(&url, &params, &self.search_policy).await {
            Ok(response) => {
                let papers: Vec<_> = response
                    .data
                    .iter()
                    .filter_map(|p| Self::normalize(p, filter, keyword))
                    .collect();
                tracing::info!(
                    keyword,
                    retrieved = response.data.len(),
                    accepted = papers.len(),
                    "semantic scholar search"
                );
                papers
            }
            Err(err) => {
                tracing::warn!(keyword, error = %err, "semantic scholar search failed");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for SemanticScholarProvider {
    fn source(&self) -> SourceApi {
        SourceApi::SemanticScholar
    }

    async fn summary_by_id(&self, identifier: &str) -> Option<String> {
        let url = format!("{}/paper/DOI:{identifier}", self.base_url);
        let params = vec![("fields".to_string(), fields::SUMMARY.join(","))];

        match self.http.get::<SsPaper>(&url, &params, &self.lookup_policy).await {
            Ok(paper) => paper.r#abstract.filter(|a| !a.trim().is_empty()),
            Err(err) => {
                tracing::debug!(identifier, error = %err, "semantic scholar lookup failed");
                None
            }
        }
    }
}
