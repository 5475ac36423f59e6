//! Network Backbone Extraction Library
//!
//! Extracts the statistically significant "backbone" of a weighted network
//! whose edge weights are noisy observation counts. Every edge is scored
//! against a null model of the weight it should carry given the strengths
//! or degrees of its endpoints, and a threshold keeps only the surprising
//! edges.
//!
//! # Overview
//!
//! - **data**: Edge tables (input) and scored tables (output)
//! - **score**: Scoring methods (noise corrected, disparity filter, naive,
//!   maximum spanning tree)
//! - **filter**: Thresholding of scored tables
//! - **pipeline**: Pipeline composition, YAML configuration and execution
//!
//! Scoring never mutates its input and never performs I/O.
//!
//! # Example
//!
//! ```no_run
//! use network_backbone::prelude::*;
//!
//! let edges = EdgeTable::from_tsv("edges.tsv").unwrap();
//!
//! let scored = noise_corrected(&edges, true, false, false);
//! let backbone = threshold(&scored, 1.64);
//! backbone.to_tsv("backbone.tsv").unwrap();
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod score;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{Column, Edge, EdgeTable, NodeId, ScoredEdge, ScoredTable};
    pub use crate::error::{BackboneError, Result};
    pub use crate::filter::{threshold, threshold_with_stats, ThresholdSummary};
    pub use crate::pipeline::{
        run_backbone, BackboneResult, Pipeline, PipelineConfig, PipelineStep,
    };
    pub use crate::score::{
        disparity_filter, maximum_spanning_tree, naive, noise_corrected, score_with, Method,
        NoiseCorrectedTerms, ScoreOptions,
    };
}
