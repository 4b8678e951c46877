//! The merge/dedupe/rank pipeline.

mod accumulator;
mod collector;
mod enricher;
mod rank;

pub use accumulator::Accumulator;
pub use collector::{CollectMode, Collector};
pub use enricher::Enricher;
pub use rank::select;
