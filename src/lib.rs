//! Pawprint - chart pipeline for daily self-tracking exports
//!
//! Pawprint turns a raw tracker CSV export (mood, energy, sleep, symptoms,
//! contextual factors) into a normalized long-form table through a
//! deterministic pipeline: extraction → time normalization → per-category
//! aggregation → rolling-trend computation → long-form assembly. The
//! assembled table feeds two chart artifacts: a multi-series measurement
//! chart and a weekly-binned factor occurrence chart.

pub mod aggregator;
pub mod chart;
pub mod error;
pub mod loader;
pub mod longform;
pub mod normalizer;
pub mod pipeline;
pub mod trend;
pub mod types;

pub use chart::{ChartBuilder, Figure};
pub use error::PipelineError;
pub use pipeline::{csv_to_longform, TrackerPipeline};
pub use types::{AggregatedRecord, Category, TrackerReport};

/// Crate version stamped into chart artifacts
pub const PAWPRINT_VERSION: &str = env!("CARGO_PKG_VERSION");
