//! Report assembly and persistence.
//!
//! The report file is the sole artifact of a run; the `enrich` subcommand
//! reads it back, backfills abstracts, and rewrites it in place.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{NormalizedPaper, RankedPaper, RunMetadata, RunReport, SourceApi};

/// Producer tag written into every report.
pub const AGENT: &str = "paper-collector";

/// Assemble a report from the final selection, assigning rank identifiers in
/// order.
#[must_use]
pub fn build(
    selected: Vec<NormalizedPaper>,
    sources: Vec<SourceApi>,
    keywords_used: Vec<String>,
    total_api_requests: u64,
) -> RunReport {
    let papers: Vec<RankedPaper> = selected
        .into_iter()
        .enumerate()
        .map(|(idx, paper)| RankedPaper { paper_id: RankedPaper::rank_id(idx + 1), paper })
        .collect();

    RunReport {
        metadata: RunMetadata {
            agent: AGENT.to_string(),
            run_id: Uuid::new_v4(),
            collected_at: Utc::now(),
            total_papers: papers.len(),
            sources,
            keywords_used,
            total_api_requests,
        },
        papers,
    }
}

/// Write a report as pretty-printed JSON, creating parent directories.
pub fn save(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing report to {}", path.display()))?;

    tracing::info!(path = %path.display(), papers = report.papers.len(), "report saved");
    Ok(())
}

/// Read a report back from disk.
pub fn load(path: &Path) -> anyhow::Result<RunReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading report from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing report {}", path.display()))
}
