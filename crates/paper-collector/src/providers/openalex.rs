//! OpenAlex adapter: keyword search over the works endpoint.

use serde::Deserialize;

use super::{SearchProvider, normalize_identifier};
use crate::client::HttpClient;
use crate::config::{HttpConfig, RecordFilter, RetryPolicy, api};
use crate::models::{NormalizedPaper, SourceApi};

/// A work as returned by the OpenAlex API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaWork {
    #[serde(default)]
    pub title: Option<String>,

    /// DOI, usually as a `https://doi.org/...` URL.
    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub cited_by_count: Option<i64>,

    #[serde(default)]
    pub publication_year: Option<i32>,

    #[serde(default)]
    pub r#abstract: Option<String>,

    #[serde(default)]
    pub primary_location: Option<OaLocation>,

    #[serde(default)]
    pub authorships: Vec<OaAuthorship>,

    #[serde(default)]
    pub r#type: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Where a work was published.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaLocation {
    #[serde(default)]
    pub source: Option<OaSource>,
}

/// The venue behind a location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaSource {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Authorship entry wrapping the actual author.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaAuthorship {
    #[serde(default)]
    pub author: Option<OaAuthor>,
}

/// Author display record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaAuthor {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OaSearchResponse {
    #[serde(default)]
    results: Vec<OaWork>,
}

/// OpenAlex provider.
#[derive(Debug, Clone)]
pub struct OpenAlexProvider {
    http: HttpClient,
    base_url: String,
    search_policy: RetryPolicy,
}

impl OpenAlexProvider {
    /// Create an adapter from the HTTP layer configuration.
    #[must_use]
    pub fn new(http: HttpClient, config: &HttpConfig) -> Self {
        Self {
            http,
            base_url: config.openalex_url.clone(),
            search_policy: config.openalex_search,
        }
    }

    /// Normalize a raw work against the filter, tagging the matching keyword.
    #[must_use]
    pub fn normalize(
        work: &OaWork,
        filter: &RecordFilter,
        keyword: &str,
    ) -> Option<NormalizedPaper> {
        let title = work.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }

        let raw_doi = work.doi.as_deref()?;
        let identifier = normalize_identifier(raw_doi)?;

        let citation_count = work.cited_by_count.unwrap_or(0);
        if !filter.accepts_citations(citation_count) {
            return None;
        }

        let year = work.publication_year?;
        if !filter.accepts_year(year) {
            return None;
        }

        let summary = work.r#abstract.clone().unwrap_or_default();
        if filter.require_summary && summary.trim().is_empty() {
            return None;
        }

        let venue = work
            .primary_location
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
            .and_then(|src| src.display_name.clone())
            .unwrap_or_default();

        Some(NormalizedPaper {
            title: title.to_string(),
            authors: work
                .authorships
                .iter()
                .map(|a| {
                    a.author
                        .as_ref()
                        .and_then(|author| author.display_name.clone())
                        .unwrap_or_else(|| "Unknown".to_string())
                })
                .collect(),
            year,
            is_trusted_venue: filter.is_trusted(&venue),
            venue,
            identifier,
            citation_count,
            summary,
            publication_type: work.r#type.clone().unwrap_or_else(|| "article".to_string()),
            matched_keywords: vec![keyword.to_string()],
            source: SourceApi::OpenAlex,
            url: work.url.clone().unwrap_or_else(|| raw_doi.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for OpenAlexProvider {
    fn source(&self) -> SourceApi {
        SourceApi::OpenAlex
    }

    async fn search(&self, keyword: &str, filter: &RecordFilter) -> Vec<NormalizedPaper> {
        let url = format!("{}/works", self.base_url);
        let params = vec![
            ("search".to_string(), keyword.to_string()),
            (
                "filter".to_string(),
                format!(
                    "cited_by_count:>{},publication_year:{}-{}",
                    filter.minimum_citation_count, filter.year_range.min, filter.year_range.max
                ),
            ),
            ("per_page".to_string(), api::OPENALEX_PAGE_SIZE.to_string()),
        ];

        match self.http.get::<OaSearchResponse>(&url, &params, &self.search_policy).await {
            Ok(response) => {
                let papers: Vec<_> = response
                    .results
                    .iter()
                    .filter_map(|w| Self::normalize(w, filter, keyword))
                    .collect();
                tracing::info!(
                    keyword,
                    retrieved = response.results.len(),
                    accepted = papers.len(),
                    "openalex search"
                );
                papers
            }
            Err(err) => {
                tracing::warn!(keyword, error = %err, "openalex search failed");
                Vec::new()
            }
        }
    }
}
