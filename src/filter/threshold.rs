//! Significance thresholding of scored tables.

use crate::data::{Column, ScoredEdge, ScoredTable};
use crate::error::{BackboneError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keep the edges of a scored table that pass `cutoff`.
///
/// When the table carries a standard deviation, an edge passes if
/// `score - cutoff * sdev > 0`, so `cutoff` is a number of standard
/// deviations. Otherwise it passes if `score > cutoff`. Both comparisons
/// are strict; rows with a NaN score or sdev never pass.
///
/// The output layout is `node1, node2, count, score`. Surviving rows are
/// unchanged and keep their order; their sdev stays attached so that
/// thresholding the output again at the same cutoff returns it unchanged.
pub fn threshold<N: Clone>(table: &ScoredTable<N>, cutoff: f64) -> ScoredTable<N> {
    let use_sdev = table.has_sdev();
    debug!(
        "Thresholding {} edges at {} ({})",
        table.len(),
        cutoff,
        if use_sdev { "score - cutoff * sdev" } else { "score" }
    );

    let rows: Vec<ScoredEdge<N>> = table
        .iter()
        .filter(|e| passes(e, cutoff, use_sdev))
        .cloned()
        .collect();

    ScoredTable::new(Column::BASE.to_vec(), rows)
}

fn passes<N>(edge: &ScoredEdge<N>, cutoff: f64, use_sdev: bool) -> bool {
    if use_sdev {
        match edge.sdev {
            Some(sdev) => edge.score - cutoff * sdev > 0.0,
            None => false,
        }
    } else {
        edge.score > cutoff
    }
}

/// Result of thresholding with statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSummary {
    /// Cutoff applied.
    pub cutoff: f64,
    /// Number of edges before thresholding.
    pub n_before: usize,
    /// Number of edges after thresholding.
    pub n_after: usize,
    /// Number of edges removed.
    pub n_removed: usize,
    /// Proportion of edges retained.
    pub retention_rate: f64,
}

impl ThresholdSummary {
    /// Convert to JSON format for export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ThresholdSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Threshold Result (cutoff {})", self.cutoff)?;
        writeln!(f, "  Before:    {} edges", self.n_before)?;
        writeln!(f, "  After:     {} edges", self.n_after)?;
        writeln!(f, "  Removed:   {} edges", self.n_removed)?;
        writeln!(f, "  Retained:  {:.1}%", self.retention_rate * 100.0)?;
        Ok(())
    }
}

/// Threshold with statistics about what was removed.
///
/// Unlike [`threshold`], rejects a non-finite cutoff.
pub fn threshold_with_stats<N: Clone>(
    table: &ScoredTable<N>,
    cutoff: f64,
) -> Result<(ScoredTable<N>, ThresholdSummary)> {
    if !cutoff.is_finite() {
        return Err(BackboneError::InvalidParameter(format!(
            "Threshold must be finite, got {}",
            cutoff
        )));
    }

    let n_before = table.len();
    let backbone = threshold(table, cutoff);
    let n_after = backbone.len();

    let summary = ThresholdSummary {
        cutoff,
        n_before,
        n_after,
        n_removed: n_before - n_after,
        retention_rate: if n_before == 0 {
            0.0
        } else {
            n_after as f64 / n_before as f64
        },
    };

    Ok((backbone, summary))
}
