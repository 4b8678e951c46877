//! Paper Collector
//!
//! Aggregates academic paper metadata from Semantic Scholar, OpenAlex and
//! Crossref, deduplicates by DOI, filters by citation count, year and venue
//! trust, and selects a ranked top-N, optionally backfilling missing
//! abstracts from a secondary source.
//!
//! # Features
//!
//! - **Sequential, paced**: one request at a time with per-provider politeness
//!   delays and a bounded, testable retry budget
//! - **Degrades, never aborts**: provider failures shrink the result set
//!   instead of failing the run
//! - **Deterministic ranking**: trusted venue, then citations, ties by
//!   insertion order
//!
//! # Example
//!
//! ```no_run
//! use paper_collector::config::{CollectionConfig, HttpConfig};
//! use paper_collector::pipeline::{CollectMode, Collector};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let collection = CollectionConfig::load(std::path::Path::new("config"))?;
//!     let collector = Collector::new(&HttpConfig::default(), collection)?;
//!     let report = collector.run(CollectMode::Standard).await;
//!     paper_collector::report::save(&report, std::path::Path::new("content/01-papers-raw.json"))?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod report;

pub use client::HttpClient;
pub use config::{CollectionConfig, HttpConfig};
pub use error::ClientError;
pub use models::{NormalizedPaper, RunReport, SourceApi};
pub use pipeline::{CollectMode, Collector};
