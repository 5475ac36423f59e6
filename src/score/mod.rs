//! Edge scoring methods.
//!
//! Each method implements its own null model and its own policy for
//! collapsing the two directions of an edge in undirected mode:
//!
//! | Method | Undirected policy |
//! |---|---|
//! | noise corrected | keep the `node1 <= node2` orientation, drop the other |
//! | disparity filter | max score, min variance per pair |
//! | naive | sum of both directions, halved |
//! | maximum spanning tree | first row per pair |

pub(crate) mod aggregate;
pub mod disparity;
pub mod mst;
pub mod naive;
pub mod noise_corrected;

pub use disparity::{disparity_filter, disparity_score, disparity_variance};
pub use mst::maximum_spanning_tree;
pub use naive::naive;
pub use noise_corrected::{noise_corrected, NoiseCorrectedTerms};

use crate::data::{EdgeTable, NodeId, ScoredTable};
use crate::error::{BackboneError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Backbone scoring method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Beta-Binomial noise-corrected score with propagated variance.
    NoiseCorrected,
    /// Disparity filter with theoretical variance.
    DisparityFilter,
    /// Raw counts.
    Naive,
    /// Maximum spanning forest.
    MaximumSpanningTree,
}

impl Method {
    /// All methods.
    pub const ALL: [Method; 4] = [
        Self::NoiseCorrected,
        Self::DisparityFilter,
        Self::Naive,
        Self::MaximumSpanningTree,
    ];

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoiseCorrected => "noise_corrected",
            Self::DisparityFilter => "disparity_filter",
            Self::Naive => "naive",
            Self::MaximumSpanningTree => "maximum_spanning_tree",
        }
    }

    /// Short code used on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoiseCorrected => "nc",
            Self::DisparityFilter => "df",
            Self::Naive => "naive",
            Self::MaximumSpanningTree => "mst",
        }
    }

    /// Whether the method can emit a p-value instead of its score.
    pub fn supports_p_value(&self) -> bool {
        matches!(self, Self::NoiseCorrected)
    }

    /// Whether the method can keep self-loops.
    pub fn supports_self_loops(&self) -> bool {
        !matches!(self, Self::MaximumSpanningTree)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Method {
    type Err = BackboneError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.code() == s || m.name() == s)
            .ok_or_else(|| {
                BackboneError::InvalidParameter(format!(
                    "Unknown method '{}'. Expected one of: nc, df, naive, mst",
                    s
                ))
            })
    }
}

/// Options shared by the scoring methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreOptions {
    /// Collapse to one row per unordered pair, using the method's policy.
    pub undirected: bool,
    /// Keep rows with `node1 == node2`.
    pub include_self_loops: bool,
    /// Emit a p-value instead of the score (noise corrected only).
    pub p_value: bool,
}

impl ScoreOptions {
    /// Check that `method` supports every requested option.
    pub fn validate(&self, method: Method) -> Result<()> {
        if self.p_value && !method.supports_p_value() {
            return Err(BackboneError::UnsupportedMode(format!(
                "p-value computation is not defined for {}",
                method
            )));
        }
        if self.include_self_loops && !method.supports_self_loops() {
            return Err(BackboneError::UnsupportedMode(format!(
                "{} never selects self-loops",
                method
            )));
        }
        Ok(())
    }
}

/// Score a table with the given method and options.
///
/// Fails with [`BackboneError::UnsupportedMode`] when an option does not
/// apply to the method, instead of ignoring it.
pub fn score_with<N: NodeId>(
    table: &EdgeTable<N>,
    method: Method,
    options: ScoreOptions,
) -> Result<ScoredTable<N>> {
    options.validate(method)?;

    let scored = match method {
        Method::NoiseCorrected => noise_corrected(
            table,
            options.undirected,
            options.include_self_loops,
            options.p_value,
        ),
        Method::DisparityFilter => {
            disparity_filter(table, options.undirected, options.include_self_loops)
        }
        Method::Naive => naive(table, options.undirected, options.include_self_loops),
        Method::MaximumSpanningTree => maximum_spanning_tree(table, options.undirected),
    };

    Ok(scored)
}
