//! Noise-corrected backbone score.
//!
//! Each count `n_ij` is compared with the expectation under a null model in
//! which the edge probability is drawn from a Beta prior fitted by method of
//! moments to the node strengths `n_i.`, `n_.j` and the total `n..`. The
//! posterior is used to propagate a variance through the score transform
//!
//! ```text
//! kappa = n.. / (n_i. * n_.j)
//! score = (kappa * n_ij - 1) / (kappa * n_ij + 1)
//! ```
//!
//! which lies in `[-1, 1]`. Alternatively the score can be the Binomial CDF
//! of the observed count under the prior mean probability.
//!
//! Zero denominators are not guarded: they surface as NaN or infinite
//! values in the affected rows.

use crate::data::{Column, EdgeTable, NodeId, ScoredEdge, ScoredTable};
use crate::score::aggregate::{retain_self_loops, strength_by};
use rayon::prelude::*;
use statrs::distribution::{Binomial, DiscreteCDF};
use tracing::debug;

/// Null-model quantities for a single row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseCorrectedTerms {
    /// Strength of the source node, `n_i.`.
    pub source_strength: f64,
    /// Strength of the target node, `n_.j`.
    pub target_strength: f64,
    /// Total weight of the table, `n..`.
    pub total: f64,
}

impl NoiseCorrectedTerms {
    /// Prior mean edge probability `n_i. * n_.j / n..^2`.
    pub fn mean_prior_probability(&self) -> f64 {
        ((self.source_strength * self.target_strength) / self.total) * (1.0 / self.total)
    }

    /// Prior variance of the edge probability.
    pub fn var_prior_probability(&self) -> f64 {
        let (ni, nj, n) = (self.source_strength, self.target_strength, self.total);
        (1.0 / (n * n)) * (ni * nj * (n - ni) * (n - nj)) / ((n * n) * (n - 1.0))
    }

    /// `n.. / (n_i. * n_.j)`
    pub fn kappa(&self) -> f64 {
        self.total / (self.source_strength * self.target_strength)
    }

    /// Normalized score of an observed count, in `[-1, 1]`.
    pub fn score(&self, count: f64) -> f64 {
        let kc = self.kappa() * count;
        (kc - 1.0) / (kc + 1.0)
    }

    /// Variance of [`score`](Self::score) for an observed count.
    pub fn score_variance(&self, count: f64) -> f64 {
        let (ni, nj, n) = (self.source_strength, self.target_strength, self.total);
        let mean = self.mean_prior_probability();
        let var = self.var_prior_probability();
        let kappa = self.kappa();

        // Beta prior by method of moments, then the binomial update.
        let alpha_prior = ((mean * mean) / var) * (1.0 - mean) - mean;
        let beta_prior = (mean / var) * (1.0 - mean * mean) - (1.0 - mean);
        let alpha_post = alpha_prior + count;
        let beta_post = n - count + beta_prior;

        let expected_pij = alpha_post / (alpha_post + beta_post);
        let variance_count = expected_pij * (1.0 - expected_pij) * n;

        // Delta method through the score transform.
        let d = (1.0 / (ni * nj)) - (n * ((ni + nj) / ((ni * nj) * (ni * nj))));
        let slope = (2.0 * (kappa + count * d)) / ((kappa * count + 1.0) * (kappa * count + 1.0));
        variance_count * slope * slope
    }

    /// Binomial CDF of `count` with `n..` trials and the prior mean probability.
    ///
    /// NaN when the distribution is undefined (non-integral total, or a
    /// probability outside `[0, 1]`).
    pub fn p_value(&self, count: f64) -> f64 {
        if self.total.fract() != 0.0 {
            return f64::NAN;
        }
        match Binomial::new(self.mean_prior_probability(), self.total as u64) {
            Ok(dist) => dist.cdf(count.floor() as u64),
            Err(_) => f64::NAN,
        }
    }
}

/// Score every edge with the noise-corrected null model.
///
/// # Arguments
/// * `table` - Edge observations
/// * `undirected` - Keep only rows with `node1 <= node2`
/// * `include_self_loops` - Keep rows with `node1 == node2`
/// * `p_value` - Emit the Binomial CDF instead of the normalized score
///
/// # Returns
/// Columns `node1, node2, count, score, sdev`, or `node1, node2, count,
/// score` when `p_value` is set.
///
/// In undirected mode reciprocal edges are not merged: the orientation with
/// `node1 <= node2` survives and the other is dropped. The p-value mode
/// returns every input row, without the self-loop or orientation filters.
pub fn noise_corrected<N: NodeId>(
    table: &EdgeTable<N>,
    undirected: bool,
    include_self_loops: bool,
    p_value: bool,
) -> ScoredTable<N> {
    debug!("Calculating NC score on {} edges", table.len());

    let edges = table.edges();
    let source_strength = strength_by(edges, |e| &e.node1);
    let target_strength = strength_by(edges, |e| &e.node2);
    let total = table.total_count();

    let terms_for = |node1: &N, node2: &N| NoiseCorrectedTerms {
        source_strength: source_strength[node1],
        target_strength: target_strength[node2],
        total,
    };

    if p_value {
        let rows: Vec<ScoredEdge<N>> = edges
            .par_iter()
            .map(|e| {
                let terms = terms_for(&e.node1, &e.node2);
                ScoredEdge::new(e.node1.clone(), e.node2.clone(), e.count, terms.p_value(e.count))
            })
            .collect();
        return ScoredTable::new(Column::BASE.to_vec(), rows);
    }

    let rows: Vec<ScoredEdge<N>> = edges
        .par_iter()
        .map(|e| {
            let terms = terms_for(&e.node1, &e.node2);
            ScoredEdge::new(e.node1.clone(), e.node2.clone(), e.count, terms.score(e.count))
                .with_sdev(terms.score_variance(e.count).sqrt())
        })
        .collect();

    let mut rows = retain_self_loops(rows, include_self_loops);
    if undirected {
        rows.retain(|e| e.node1 <= e.node2);
    }

    ScoredTable::new(Column::WITH_SDEV.to_vec(), rows)
}
