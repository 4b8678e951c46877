//! Run report document: metadata plus the ranked selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NormalizedPaper, SourceApi};

/// Metadata about a collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Producer tag.
    pub agent: String,

    /// Unique id of this run.
    pub run_id: Uuid,

    /// When the report was generated.
    pub collected_at: DateTime<Utc>,

    /// Number of papers in the selection.
    pub total_papers: usize,

    /// Providers queried, in pipeline order.
    pub sources: Vec<SourceApi>,

    /// Every keyword configured for the run.
    pub keywords_used: Vec<String>,

    /// Total network requests issued, across all providers and retries.
    pub total_api_requests: u64,
}

/// A selected paper with its assigned rank identifier.
///
/// The identifier is a rendering artifact of the final ordering, not part of
/// the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPaper {
    /// Dense 1-based rank id, `P-001` style.
    pub paper_id: String,

    /// The underlying record.
    #[serde(flatten)]
    pub paper: NormalizedPaper,
}

impl RankedPaper {
    /// Format a 1-based rank as a zero-padded id.
    #[must_use]
    pub fn rank_id(rank: usize) -> String {
        format!("P-{rank:03}")
    }
}

/// The single artifact of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run metadata.
    pub metadata: RunMetadata,

    /// Selected papers in final rank order.
    pub papers: Vec<RankedPaper>,
}
