//! Crossref adapter: keyword search (abstract-bearing works) and DOI lookup.

use serde::Deserialize;

use super::{SearchProvider, SummaryProvider, normalize_identifier};
use crate::client::HttpClient;
use crate::config::{HttpConfig, RecordFilter, RetryPolicy, api};
use crate::models::{NormalizedPaper, SourceApi};

/// A work as returned by the Crossref REST API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrWork {
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,

    /// Titles arrive as an array; the first entry is the display title.
    #[serde(default)]
    pub title: Vec<String>,

    #[serde(default)]
    pub cited_by_count: Option<i64>,

    #[serde(default)]
    pub published: Option<CrDate>,

    #[serde(default)]
    pub r#abstract: Option<String>,

    #[serde(default)]
    pub container_title: Vec<String>,

    #[serde(default)]
    pub author: Vec<CrAuthor>,

    #[serde(default)]
    pub r#type: Option<String>,
}

/// Crossref partial date: `{"date-parts": [[year, month, day]]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrDate {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl CrDate {
    /// The year component, when present.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

/// Contributor record with split name parts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrAuthor {
    #[serde(default)]
    pub given: Option<String>,

    #[serde(default)]
    pub family: Option<String>,
}

impl CrAuthor {
    /// Display name as "Given Family"; `None` without a family name.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let family = self.family.as_deref()?;
        match self.given.as_deref() {
            Some(given) => Some(format!("{given} {family}")),
            None => Some(family.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CrSearchResponse {
    #[serde(default)]
    message: CrMessage,
}

#[derive(Debug, Default, Deserialize)]
struct CrMessage {
    #[serde(default)]
    items: Vec<CrWork>,
}

#[derive(Debug, Default, Deserialize)]
struct CrLookupResponse {
    #[serde(default)]
    status: Option<String>,

    #[serde(default)]
    message: Option<CrWork>,
}

/// Crossref provider.
#[derive(Debug, Clone)]
pub struct CrossrefProvider {
    http: HttpClient,
    base_url: String,
    search_policy: RetryPolicy,
    lookup_policy: RetryPolicy,
}

impl CrossrefProvider {
    /// Create an adapter from the HTTP layer configuration.
    #[must_use]
    pub fn new(http: HttpClient, config: &HttpConfig) -> Self {
        Self {
            http,
            base_url: config.crossref_url.clone(),
            search_policy: config.crossref_search,
            lookup_policy: config.crossref_lookup,
        }
    }

    /// Normalize a raw work against the filter, tagging the matching keyword.
    #[must_use]
    pub fn normalize(
        work: &CrWork,
        filter: &RecordFilter,
        keyword: &str,
    ) -> Option<NormalizedPaper> {
        let title = work.title.first()?.trim();
        if title.is_empty() {
            return None;
        }

        let identifier = normalize_identifier(work.doi.as_deref().unwrap_or(""))?;

        let citation_count = work.cited_by_count.unwrap_or(0);
        if !filter.accepts_citations(citation_count) {
            return None;
        }

        let year = work.published.as_ref().and_then(CrDate::year)?;
        if !filter.accepts_year(year) {
            return None;
        }

        let summary = work.r#abstract.clone().unwrap_or_default();
        if filter.require_summary && summary.trim().is_empty() {
            return None;
        }

        let venue = work.container_title.first().cloned().unwrap_or_default();

        Some(NormalizedPaper {
            title: title.to_string(),
            authors: work.author.iter().filter_map(CrAuthor::display_name).collect(),
            year,
            is_trusted_venue: filter.is_trusted(&venue),
            venue,
            url: format!("https://doi.org/{identifier}"),
            identifier,
            citation_count,
            summary,
            publication_type: work.r#type.clone().unwrap_or_else(|| "article".to_string()),
            matched_keywords: vec![keyword.to_string()],
            source: SourceApi::Crossref,
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for CrossrefProvider {
    fn source(&self) -> SourceApi {
        SourceApi::Crossref
    }

    async fn search(&self, keyword: &str, filter: &RecordFilter) -> Vec<NormalizedPaper> {
        let url = format!("{}/works", self.base_url);
        let params = vec![
            ("query".to_string(), keyword.to_string()),
            ("rows".to_string(), api::CROSSREF_PAGE_SIZE.to_string()),
            ("sort".to_string(), "cited".to_string()),
            ("order".to_string(), "desc".to_string()),
            (
                "filter".to_string(),
                format!(
                    "from-pub-date:{}-01-01,until-pub-date:{}-12-31,has-abstract:true",
                    filter.year_range.min, filter.year_range.max
                ),
            ),
        ];

        match self.http.get::<CrSearchResponse>(&url, &params, &self.search_policy).await {
            Ok(response) => {
                let papers: Vec<_> = response
                    .message
                    .items
                    .iter()
                    .filter_map(|w| Self::normalize(w, filter, keyword))
                    .collect();
                tracing::info!(
                    keyword,
                    retrieved = response.message.items.len(),
                    accepted = papers.len(),
                    "crossref search"
                );
                papers
            }
            Err(err) => {
                tracing::warn!(keyword, error = %err, "crossref search failed");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for CrossrefProvider {
    fn source(&self) -> SourceApi {
        SourceApi::Crossref
    }

    async fn summary_by_id(&self, identifier: &str) -> Option<String> {
        let url = format!("{}/works/{identifier}", self.base_url);

        match self.http.get::<CrLookupResponse>(&url, &[], &self.lookup_policy).await {
            Ok(response) => {
                if response.status.as_deref() != Some("ok") {
                    return None;
                }
                response
                    .message
                    .and_then(|work| work.r#abstract)
                    .filter(|a| !a.trim().is_empty())
            }
            Err(err) => {
                tracing::debug!(identifier, error = %err, "crossref lookup failed");
                None
            }
        }
    }
}
