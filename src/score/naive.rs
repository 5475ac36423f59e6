//! Naive baseline: the score is the raw count.

use crate::data::{Column, EdgeTable, NodeId, ScoredEdge, ScoredTable};
use crate::score::aggregate::{collapse_undirected, retain_self_loops};
use tracing::debug;

/// Score every edge with its own count.
///
/// In undirected mode all rows of an unordered pair are summed and the sum
/// is halved, so a reciprocated pair scores the average of its two
/// directions and a one-directional edge scores half its count.
///
/// Columns: `node1, node2, count, score`.
pub fn naive<N: NodeId>(
    table: &EdgeTable<N>,
    undirected: bool,
    include_self_loops: bool,
) -> ScoredTable<N> {
    debug!("Calculating Naive score on {} edges", table.len());

    let rows: Vec<ScoredEdge<N>> = table
        .iter()
        .map(|e| ScoredEdge::new(e.node1.clone(), e.node2.clone(), e.count, e.count))
        .collect();

    let mut rows = retain_self_loops(rows, include_self_loops);
    if undirected {
        rows = collapse_undirected(rows, |kept, other| kept.score += other.score);
        for row in &mut rows {
            row.score /= 2.0;
        }
    }

    ScoredTable::new(Column::BASE.to_vec(), rows)
}
