//! Configuration for the paper collector.
//!
//! Two layers: `HttpConfig` carries provider endpoints and retry tuning
//! (overridable for mock servers in tests), `CollectionConfig` carries the
//! run parameters loaded from the JSON config directory.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// OpenAlex API endpoint.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// Crossref REST API endpoint.
    pub const CROSSREF_API: &str = "https://api.crossref.org/v1";

    /// User-Agent sent with every request (Crossref politeness).
    pub const USER_AGENT: &str = concat!("paper-collector/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Per-request timeout for search calls.
    pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Per-request timeout for Crossref search calls (slower endpoint).
    pub const CROSSREF_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Per-request timeout for identifier lookups.
    pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum retries for a search call.
    pub const SEARCH_RETRY_BUDGET: u32 = 3;

    /// Maximum retries for an identifier lookup.
    pub const LOOKUP_RETRY_BUDGET: u32 = 2;

    /// Backoff after a 429 on Semantic Scholar / OpenAlex search.
    pub const SEARCH_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(10);

    /// Backoff after a 429 on an identifier lookup.
    pub const LOOKUP_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

    /// Backoff after a 429 on Crossref search.
    pub const CROSSREF_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

    /// Backoff after any other transport or parse failure on search.
    pub const SEARCH_TRANSPORT_BACKOFF: Duration = Duration::from_secs(2);

    /// Backoff after any other transport or parse failure on lookup.
    pub const LOOKUP_TRANSPORT_BACKOFF: Duration = Duration::from_secs(1);

    /// Politeness delay after a successful search call.
    pub const SEARCH_POLITENESS_DELAY: Duration = Duration::from_secs(1);

    /// Politeness delay after a successful lookup or Crossref call.
    pub const SHORT_POLITENESS_DELAY: Duration = Duration::from_millis(500);

    /// Result page size for Semantic Scholar search.
    pub const SEMANTIC_SCHOLAR_PAGE_SIZE: i32 = 100;

    /// Result page size for OpenAlex search.
    pub const OPENALEX_PAGE_SIZE: i32 = 50;

    /// Result page size for Crossref search.
    pub const CROSSREF_PAGE_SIZE: i32 = 50;

    /// Default number of papers in the final selection.
    pub const DEFAULT_SELECTION_LIMIT: usize = 50;
}

/// Paper field sets for Semantic Scholar requests.
pub mod fields {
    /// Fields requested on search and full lookups.
    pub const SEARCH: &[&str] = &[
        "title",
        "authors",
        "year",
        "venue",
        "citationCount",
        "abstract",
        "externalIds",
        "publicationTypes",
        "url",
    ];

    /// Fields requested when only the abstract is needed.
    pub const SUMMARY: &[&str] = &["abstract"];
}

/// Retry behavior for one provider endpoint.
///
/// The retry budget is a visible parameter of the bounded loop in the HTTP
/// client, not a hidden middleware policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt.
    pub max_retries: u32,

    /// Backoff before re-attempting after a 429.
    pub rate_limit_backoff: Duration,

    /// Backoff before re-attempting after any other failure.
    pub transport_backoff: Duration,

    /// Delay after every successful call, before the caller's next request.
    pub politeness_delay: Duration,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl RetryPolicy {
    /// Policy for Semantic Scholar and OpenAlex search calls.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            max_retries: api::SEARCH_RETRY_BUDGET,
            rate_limit_backoff: api::SEARCH_RATE_LIMIT_BACKOFF,
            transport_backoff: api::SEARCH_TRANSPORT_BACKOFF,
            politeness_delay: api::SEARCH_POLITENESS_DELAY,
            request_timeout: api::SEARCH_TIMEOUT,
        }
    }

    /// Policy for identifier lookups (tighter budget, shorter waits).
    #[must_use]
    pub const fn lookup() -> Self {
        Self {
            max_retries: api::LOOKUP_RETRY_BUDGET,
            rate_limit_backoff: api::LOOKUP_RATE_LIMIT_BACKOFF,
            transport_backoff: api::LOOKUP_TRANSPORT_BACKOFF,
            politeness_delay: api::SHORT_POLITENESS_DELAY,
            request_timeout: api::LOOKUP_TIMEOUT,
        }
    }

    /// Policy for Crossref search calls.
    #[must_use]
    pub const fn crossref_search() -> Self {
        Self {
            max_retries: api::SEARCH_RETRY_BUDGET,
            rate_limit_backoff: api::CROSSREF_RATE_LIMIT_BACKOFF,
            transport_backoff: api::SEARCH_TRANSPORT_BACKOFF,
            politeness_delay: api::SHORT_POLITENESS_DELAY,
            request_timeout: api::CROSSREF_SEARCH_TIMEOUT,
        }
    }

    /// Same budget with all waits zeroed, for tests against mock servers.
    #[must_use]
    pub const fn without_delays(mut self) -> Self {
        self.rate_limit_backoff = Duration::ZERO;
        self.transport_backoff = Duration::ZERO;
        self.politeness_delay = Duration::ZERO;
        self
    }
}

/// HTTP layer configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Semantic Scholar API key (optional, raises rate limits).
    pub api_key: Option<String>,

    /// Base URL for the Semantic Scholar Graph API.
    pub semantic_scholar_url: String,

    /// Base URL for the OpenAlex API.
    pub openalex_url: String,

    /// Base URL for the Crossref API.
    pub crossref_url: String,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retry policy for Semantic Scholar search.
    pub semantic_scholar_search: RetryPolicy,

    /// Retry policy for Semantic Scholar DOI lookup.
    pub semantic_scholar_lookup: RetryPolicy,

    /// Retry policy for OpenAlex search.
    pub openalex_search: RetryPolicy,

    /// Retry policy for Crossref search.
    pub crossref_search: RetryPolicy,

    /// Retry policy for Crossref DOI lookup.
    pub crossref_lookup: RetryPolicy,
}

impl HttpConfig {
    /// Create a configuration with the production endpoints.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            semantic_scholar_url: api::SEMANTIC_SCHOLAR_API.to_string(),
            openalex_url: api::OPENALEX_API.to_string(),
            crossref_url: api::CROSSREF_API.to_string(),
            connect_timeout: api::CONNECT_TIMEOUT,
            semantic_scholar_search: RetryPolicy::search(),
            semantic_scholar_lookup: RetryPolicy::lookup(),
            openalex_search: RetryPolicy::search(),
            crossref_search: RetryPolicy::crossref_search(),
            crossref_lookup: RetryPolicy::lookup(),
        }
    }

    /// Create a test configuration pointing every provider at a mock server.
    ///
    /// All backoffs and politeness delays are zeroed so tests run fast; retry
    /// budgets keep their production values.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            semantic_scholar_url: format!("{base_url}/graph/v1"),
            openalex_url: format!("{base_url}/openalex"),
            crossref_url: format!("{base_url}/crossref/v1"),
            connect_timeout: Duration::from_secs(2),
            semantic_scholar_search: RetryPolicy::search().without_delays(),
            semantic_scholar_lookup: RetryPolicy::lookup().without_delays(),
            openalex_search: RetryPolicy::search().without_delays(),
            crossref_search: RetryPolicy::crossref_search().without_delays(),
            crossref_lookup: RetryPolicy::lookup().without_delays(),
        }
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Inclusive publication-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Earliest accepted year.
    pub min: i32,

    /// Latest accepted year.
    pub max: i32,
}

impl YearRange {
    /// Check whether a year falls inside the range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// How the accumulator treats repeat sightings of an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeStrategy {
    /// First sighting wins every field; later sightings only add keywords.
    #[default]
    KeepFirst,

    /// Like `KeepFirst`, but a later sighting may fill an empty summary.
    PreferRicher,
}

/// Gatekeeping filter applied by every adapter before a record may enter the
/// accumulator.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    /// Minimum citation count.
    pub minimum_citation_count: i64,

    /// Accepted publication-year range.
    pub year_range: YearRange,

    /// Venues counted as trusted for ranking.
    pub trusted_venues: HashSet<String>,

    /// Reject records without an abstract.
    pub require_summary: bool,
}

impl RecordFilter {
    /// Citation-count gate.
    #[must_use]
    pub const fn accepts_citations(&self, count: i64) -> bool {
        count >= self.minimum_citation_count
    }

    /// Year gate.
    #[must_use]
    pub const fn accepts_year(&self, year: i32) -> bool {
        self.year_range.contains(year)
    }

    /// Trusted-venue membership test; an empty venue is never trusted.
    #[must_use]
    pub fn is_trusted(&self, venue: &str) -> bool {
        !venue.is_empty() && self.trusted_venues.contains(venue)
    }
}

#[derive(Debug, Deserialize)]
struct KeywordsFile {
    primary_keywords: Vec<String>,
    secondary_keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TrustedSourcesFile {
    trusted_journals: Vec<String>,
    minimum_citation_count: i64,
    year_range: YearRange,
}

/// Run parameters for a collection, loaded from the config directory.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// Keywords for the primary search phase.
    pub primary_keywords: Vec<String>,

    /// Keywords for the supplementary search phase.
    pub secondary_keywords: Vec<String>,

    /// Venue allow-list used as the primary ranking key.
    pub trusted_venues: HashSet<String>,

    /// Minimum citation count for acceptance.
    pub minimum_citation_count: i64,

    /// Accepted publication-year range.
    pub year_range: YearRange,

    /// Size of the final selection (also the accumulation target).
    pub selection_limit: usize,

    /// Merge behavior for repeat sightings.
    pub merge_strategy: MergeStrategy,
}

impl CollectionConfig {
    /// Load `keywords.json` and `trusted_sources.json` from a directory.
    pub fn load(config_dir: &Path) -> anyhow::Result<Self> {
        let keywords: KeywordsFile = read_json(config_dir, "keywords.json")?;
        let trusted: TrustedSourcesFile = read_json(config_dir, "trusted_sources.json")?;

        Ok(Self {
            primary_keywords: keywords.primary_keywords,
            secondary_keywords: keywords.secondary_keywords,
            trusted_venues: trusted.trusted_journals.into_iter().collect(),
            minimum_citation_count: trusted.minimum_citation_count,
            year_range: trusted.year_range,
            selection_limit: api::DEFAULT_SELECTION_LIMIT,
            merge_strategy: MergeStrategy::default(),
        })
    }

    /// Build the adapter gatekeeping filter.
    #[must_use]
    pub fn record_filter(&self, require_summary: bool) -> RecordFilter {
        RecordFilter {
            minimum_citation_count: self.minimum_citation_count,
            year_range: self.year_range,
            trusted_venues: self.trusted_venues.clone(),
            require_summary,
        }
    }

    /// Every configured keyword, primary first (report metadata).
    #[must_use]
    pub fn all_keywords(&self) -> Vec<String> {
        self.primary_keywords.iter().chain(&self.secondary_keywords).cloned().collect()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> anyhow::Result<T> {
    let path = dir.join(name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
