//! Data models: the normalized paper record and the run report document.

mod paper;
mod report;

pub use paper::{NormalizedPaper, SourceApi};
pub use report::{RankedPaper, RunMetadata, RunReport};
