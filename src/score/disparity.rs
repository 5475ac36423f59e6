//! Disparity filter.
//!
//! Under the null model a node's outgoing weight is split uniformly at
//! random among its `k` outgoing edges. The score of an edge carrying a
//! share `p = count / strength` is `1 - (1 - p)^(k - 1)`, the probability of
//! a share no larger than `p` by chance. The variance of the score depends
//! only on `k`.

use crate::data::{Column, EdgeTable, NodeId, ScoredEdge, ScoredTable};
use crate::score::aggregate::{collapse_undirected, out_degree, retain_self_loops, strength_by};
use rayon::prelude::*;
use tracing::debug;

/// Disparity score of a single edge.
///
/// `degree` is the number of outgoing rows of the source node. Degree-1
/// nodes give a score of 0 (and NaN for a zero strength).
pub fn disparity_score(count: f64, strength: f64, degree: usize) -> f64 {
    let k = degree as f64;
    1.0 - (1.0 - (count / strength)).powf(k - 1.0)
}

/// Theoretical variance of the disparity score for out-degree `degree`.
pub fn disparity_variance(degree: usize) -> f64 {
    let k = degree as f64;
    (k * k)
        * (((20.0 + 4.0 * k) / ((k + 1.0) * (k + 2.0) * (k + 3.0)))
            - (4.0 / ((k + 1.0) * (k + 1.0))))
}

/// Score every edge with the disparity filter.
///
/// In undirected mode the two directed observations of a pair collapse to
/// one row carrying the larger score and, independently, the smaller
/// variance. The surviving row keeps the endpoints and count of the first
/// occurrence.
///
/// Columns: `node1, node2, count, score, variance, sdev`.
pub fn disparity_filter<N: NodeId>(
    table: &EdgeTable<N>,
    undirected: bool,
    include_self_loops: bool,
) -> ScoredTable<N> {
    debug!("Calculating DF score on {} edges", table.len());

    let edges = table.edges();
    let strength = strength_by(edges, |e| &e.node1);
    let degree = out_degree(edges);

    let rows: Vec<ScoredEdge<N>> = edges
        .par_iter()
        .map(|e| {
            let k = degree[&e.node1];
            let score = disparity_score(e.count, strength[&e.node1], k);
            ScoredEdge::new(e.node1.clone(), e.node2.clone(), e.count, score)
                .with_variance(disparity_variance(k))
        })
        .collect();

    let mut rows = retain_self_loops(rows, include_self_loops);
    if undirected {
        rows = collapse_undirected(rows, |kept, other| {
            kept.score = kept.score.max(other.score);
            let variance = match (kept.variance, other.variance) {
                (Some(a), Some(b)) => a.min(b),
                (a, b) => a.or(b).unwrap_or(f64::NAN),
            };
            kept.variance = Some(variance);
            kept.sdev = Some(variance.sqrt());
        });
    }

    ScoredTable::new(Column::WITH_VARIANCE.to_vec(), rows)
}
