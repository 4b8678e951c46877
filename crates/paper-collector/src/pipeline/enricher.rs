//! Abstract backfill pass.

use std::collections::HashMap;

use crate::models::{NormalizedPaper, SourceApi};
use crate::providers::SummaryProvider;

/// Fills empty summaries by identifier lookup against one or more secondary
/// sources, tried in order.
///
/// Idempotent: a record that already carries a summary is never touched, so a
/// second pass issues no lookups for it. Failures leave the record unchanged
/// and never abort the batch.
pub struct Enricher<'a> {
    sources: Vec<&'a dyn SummaryProvider>,
}

impl<'a> Enricher<'a> {
    /// Create an enricher over an ordered chain of summary sources.
    #[must_use]
    pub fn new(sources: Vec<&'a dyn SummaryProvider>) -> Self {
        Self { sources }
    }

    /// Try to fill one record's summary. Returns the provider that supplied
    /// it, or `None` when the record already had one or every source failed.
    pub async fn fill_summary(&self, paper: &mut NormalizedPaper) -> Option<SourceApi> {
        if paper.has_summary() {
            return None;
        }

        for source in &self.sources {
            if let Some(summary) = source.summary_by_id(&paper.identifier).await {
                paper.summary = summary;
                return Some(source.source());
            }
        }

        tracing::debug!(identifier = %paper.identifier, "no summary found");
        None
    }

    /// Run the pass over a set of records, optionally restricted to those
    /// first produced by one provider. Returns fill counts per source.
    pub async fn enrich_all<'p, I>(
        &self,
        papers: I,
        restrict_to: Option<SourceApi>,
    ) -> HashMap<SourceApi, usize>
    where
        I: IntoIterator<Item = &'p mut NormalizedPaper>,
    {
        let mut filled: HashMap<SourceApi, usize> = HashMap::new();

        for paper in papers {
            if restrict_to.is_some_and(|source| paper.source != source) {
                continue;
            }
            if let Some(source) = self.fill_summary(paper).await {
                *filled.entry(source).or_default() += 1;
            }
        }

        filled
    }
}
