//! Deduplicating accumulator keyed by normalized identifier.

use std::collections::HashMap;

use crate::config::MergeStrategy;
use crate::models::{NormalizedPaper, SourceApi};

/// In-memory store holding exactly one record per identifier.
///
/// Records are kept in insertion order so rank ties resolve deterministically.
#[derive(Debug)]
pub struct Accumulator {
    merge_strategy: MergeStrategy,
    index: HashMap<String, usize>,
    papers: Vec<NormalizedPaper>,
}

impl Accumulator {
    /// Create an empty accumulator with the given merge behavior.
    #[must_use]
    pub fn new(merge_strategy: MergeStrategy) -> Self {
        Self { merge_strategy, index: HashMap::new(), papers: Vec::new() }
    }

    /// Accept a sighting of a paper produced by keyword search.
    ///
    /// An unseen identifier is inserted as-is. A repeat sighting only unions
    /// the keyword into the existing record's matched set; every other field
    /// keeps its first-writer value, except that under
    /// `MergeStrategy::PreferRicher` a later sighting may fill a still-empty
    /// summary. Returns true when the record was newly inserted.
    pub fn accept(&mut self, paper: NormalizedPaper, keyword: &str) -> bool {
        match self.index.get(&paper.identifier).copied() {
            Some(pos) => {
                let existing = &mut self.papers[pos];
                existing.add_keyword(keyword);
                if self.merge_strategy == MergeStrategy::PreferRicher
                    && !existing.has_summary()
                    && paper.has_summary()
                {
                    existing.summary = paper.summary;
                }
                false
            }
            None => {
                let mut paper = paper;
                paper.add_keyword(keyword);
                self.index.insert(paper.identifier.clone(), self.papers.len());
                self.papers.push(paper);
                true
            }
        }
    }

    /// Number of distinct records accumulated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the accumulator is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&NormalizedPaper> {
        self.index.get(identifier).map(|&pos| &self.papers[pos])
    }

    /// Records in insertion order.
    #[must_use]
    pub fn papers(&self) -> &[NormalizedPaper] {
        &self.papers
    }

    /// Mutable records, for the enrichment pass. Identifiers must not change.
    pub fn papers_mut(&mut self) -> impl Iterator<Item = &mut NormalizedPaper> {
        self.papers.iter_mut()
    }

    /// How many records a given provider first produced.
    #[must_use]
    pub fn count_by_source(&self, source: SourceApi) -> usize {
        self.papers.iter().filter(|p| p.source == source).count()
    }
}
