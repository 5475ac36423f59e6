//! Backbone extraction from scored tables.

pub mod threshold;

pub use threshold::{threshold, threshold_with_stats, ThresholdSummary};
