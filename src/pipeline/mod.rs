//! Pipeline composition and execution for backbone extraction.

mod runner;

pub use runner::{run_backbone, BackboneResult, Pipeline, PipelineConfig, PipelineStep};
