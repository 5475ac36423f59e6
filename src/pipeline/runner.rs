//! Pipeline runner for composing and executing backbone extraction.

use crate::data::{EdgeTable, NodeId, ScoredTable};
use crate::error::{BackboneError, Result};
use crate::filter::{threshold_with_stats, ThresholdSummary};
use crate::score::{score_with, Method, ScoreOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A step in the backbone pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Score every edge with one method.
    Score {
        method: Method,
        #[serde(default)]
        options: ScoreOptions,
    },
    /// Keep edges passing a significance cutoff.
    Threshold { cutoff: f64 },
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Steps to execute.
    pub steps: Vec<PipelineStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(BackboneError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(BackboneError::from)
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct BackboneResult<N = String> {
    /// Name of the pipeline that produced the result.
    pub name: String,
    /// Scoring method used.
    pub method: Method,
    /// Scored (and possibly thresholded) edges.
    pub table: ScoredTable<N>,
    /// Statistics of the threshold step, if any.
    pub threshold: Option<ThresholdSummary>,
}

/// Builder for constructing and running backbone pipelines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    name: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            name: config.name.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add a scoring step.
    pub fn score(mut self, method: Method, options: ScoreOptions) -> Self {
        self.steps.push(PipelineStep::Score { method, options });
        self
    }

    /// Add noise-corrected scoring.
    pub fn noise_corrected(self, options: ScoreOptions) -> Self {
        self.score(Method::NoiseCorrected, options)
    }

    /// Add disparity filter scoring.
    pub fn disparity_filter(self, options: ScoreOptions) -> Self {
        self.score(Method::DisparityFilter, options)
    }

    /// Add naive scoring.
    pub fn naive(self, options: ScoreOptions) -> Self {
        self.score(Method::Naive, options)
    }

    /// Add maximum spanning tree extraction.
    pub fn maximum_spanning_tree(self, undirected: bool) -> Self {
        self.score(
            Method::MaximumSpanningTree,
            ScoreOptions {
                undirected,
                ..Default::default()
            },
        )
    }

    /// Add a threshold step.
    pub fn threshold(mut self, cutoff: f64) -> Self {
        self.steps.push(PipelineStep::Threshold { cutoff });
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// Run the pipeline on an edge table.
    pub fn run<N: NodeId>(&self, table: &EdgeTable<N>) -> Result<BackboneResult<N>> {
        let mut state = PipelineState::new(table);

        for (i, step) in self.steps.iter().enumerate() {
            state = state.apply(step).map_err(|e| {
                BackboneError::Pipeline(format!("Step {} ({:?}) failed: {}", i + 1, step, e))
            })?;
        }

        state.finalize(&self.name)
    }
}

/// Internal state during pipeline execution.
struct PipelineState<'a, N> {
    table: &'a EdgeTable<N>,
    method: Option<Method>,
    scored: Option<ScoredTable<N>>,
    threshold: Option<ThresholdSummary>,
}

impl<'a, N: NodeId> PipelineState<'a, N> {
    fn new(table: &'a EdgeTable<N>) -> Self {
        Self {
            table,
            method: None,
            scored: None,
            threshold: None,
        }
    }

    fn apply(mut self, step: &PipelineStep) -> Result<Self> {
        match step {
            PipelineStep::Score { method, options } => {
                if self.method.is_some() {
                    return Err(BackboneError::Pipeline(
                        "Only one scoring step is allowed".to_string(),
                    ));
                }
                info!("Scoring {} edges with {}", self.table.len(), method);
                self.scored = Some(score_with(self.table, *method, *options)?);
                self.method = Some(*method);
            }

            PipelineStep::Threshold { cutoff } => {
                let scored = self.scored.as_ref().ok_or_else(|| {
                    BackboneError::Pipeline("Must score edges before thresholding".to_string())
                })?;
                let (backbone, summary) = threshold_with_stats(scored, *cutoff)?;
                info!(
                    "Threshold {} kept {} of {} edges",
                    cutoff, summary.n_after, summary.n_before
                );
                self.scored = Some(backbone);
                self.threshold = Some(summary);
            }
        }
        Ok(self)
    }

    fn finalize(self, name: &str) -> Result<BackboneResult<N>> {
        let (method, table) = match (self.method, self.scored) {
            (Some(method), Some(table)) => (method, table),
            _ => {
                return Err(BackboneError::Pipeline(
                    "Pipeline must include a scoring step".to_string(),
                ))
            }
        };

        Ok(BackboneResult {
            name: name.to_string(),
            method,
            table,
            threshold: self.threshold,
        })
    }
}

/// Convenience function to score a table and optionally threshold it.
pub fn run_backbone<N: NodeId>(
    table: &EdgeTable<N>,
    method: Method,
    options: ScoreOptions,
    cutoff: Option<f64>,
) -> Result<BackboneResult<N>> {
    let mut pipeline = Pipeline::new().name(method.name()).score(method, options);
    if let Some(cutoff) = cutoff {
        pipeline = pipeline.threshold(cutoff);
    }
    pipeline.run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn create_test_table() -> EdgeTable {
        EdgeTable::from_triples([
            ("A", "B", 20.0),
            ("B", "A", 18.0),
            ("A", "C", 2.0),
            ("B", "C", 3.0),
            ("C", "D", 15.0),
            ("D", "C", 12.0),
            ("D", "A", 1.0),
            ("B", "D", 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder() {
        let pipeline = Pipeline::new()
            .name("test")
            .disparity_filter(ScoreOptions::default())
            .threshold(0.5);

        let config = pipeline.to_config(Some("Test pipeline"));
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.name, "test");
    }

    #[test]
    fn test_pipeline_run() {
        let table = create_test_table();
        let result = Pipeline::new()
            .name("nc")
            .noise_corrected(ScoreOptions {
                undirected: true,
                ..Default::default()
            })
            .threshold(0.0)
            .run(&table)
            .unwrap();

        assert_eq!(result.method, Method::NoiseCorrected);
        assert_eq!(result.table.columns(), &Column::BASE);
        let summary = result.threshold.unwrap();
        assert_eq!(summary.n_after, result.table.len());
        assert!(summary.n_after <= summary.n_before);
    }

    #[test]
    fn test_run_without_threshold_keeps_layout() {
        let table = create_test_table();
        let result = run_backbone(&table, Method::DisparityFilter, ScoreOptions::default(), None)
            .unwrap();
        assert_eq!(result.name, "disparity_filter");
        assert_eq!(result.table.columns(), &Column::WITH_VARIANCE);
        assert!(result.threshold.is_none());
    }

    #[test]
    fn test_run_backbone_mst() {
        let table = create_test_table();
        let result = run_backbone(
            &table,
            Method::MaximumSpanningTree,
            ScoreOptions {
                undirected: true,
                ..Default::default()
            },
            None,
        )
        .unwrap();
        // Four nodes, one component.
        assert_eq!(result.table.len(), 3);
    }

    #[test]
    fn test_pipeline_config_yaml() {
        let pipeline = Pipeline::new()
            .name("example")
            .noise_corrected(ScoreOptions {
                undirected: true,
                ..Default::default()
            })
            .threshold(1.28);

        let config = pipeline.to_config(Some("Example noise-corrected backbone"));
        let yaml = config.to_yaml().unwrap();

        let parsed = PipelineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.name, "example");
        assert_eq!(parsed.steps, config.steps);
    }

    #[test]
    fn test_config_options_default() {
        let yaml = "name: minimal\ndescription: null\nsteps:\n  - !Score\n    method: naive\n";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.steps,
            vec![PipelineStep::Score {
                method: Method::Naive,
                options: ScoreOptions::default(),
            }]
        );
    }

    #[test]
    fn test_pipeline_error_handling() {
        let table = create_test_table();

        // Threshold without a scoring step
        let result = Pipeline::new().threshold(0.5).run(&table);
        assert!(matches!(result, Err(BackboneError::Pipeline(_))));

        // No steps at all
        assert!(Pipeline::new().run(&table).is_err());

        // Two scoring steps
        let result = Pipeline::new()
            .naive(ScoreOptions::default())
            .disparity_filter(ScoreOptions::default())
            .run(&table);
        assert!(result.is_err());

        // Unsupported option surfaces through the step error
        let result = Pipeline::new()
            .naive(ScoreOptions {
                p_value: true,
                ..Default::default()
            })
            .run(&table);
        match result {
            Err(BackboneError::Pipeline(msg)) => assert!(msg.contains("Unsupported mode")),
            other => panic!("expected pipeline error, got {:?}", other.map(|r| r.name)),
        }
    }
}
