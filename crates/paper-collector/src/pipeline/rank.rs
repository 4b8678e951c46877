//! Ranking and selection of the accumulated set.

use super::Accumulator;
use crate::models::NormalizedPaper;

/// Rank the accumulated records and truncate to `limit`.
///
/// Descending by trusted-venue flag, then by citation count. The sort is
/// stable over the accumulator's insertion order, so ties resolve by
/// insertion sequence and the output is deterministic for a fixed input.
#[must_use]
pub fn select(accumulator: &Accumulator, limit: usize) -> Vec<NormalizedPaper> {
    let mut ranked: Vec<&NormalizedPaper> = accumulator.papers().iter().collect();
    ranked.sort_by(|a, b| {
        b.is_trusted_venue
            .cmp(&a.is_trusted_venue)
            .then_with(|| b.citation_count.cmp(&a.citation_count))
    });
    ranked.into_iter().take(limit).cloned().collect()
}
