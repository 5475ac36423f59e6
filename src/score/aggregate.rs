//! Group-by helpers shared by the scoring methods.
//!
//! Every helper is a pure aggregation over the whole table; results do not
//! depend on row order except where "first occurrence" is stated.

use crate::data::{Edge, NodeId, ScoredEdge};
use std::collections::HashMap;

/// Sum of counts grouped by the node selected with `key` (node strength).
pub(crate) fn strength_by<'a, N, F>(edges: &'a [Edge<N>], key: F) -> HashMap<&'a N, f64>
where
    N: NodeId,
    F: Fn(&'a Edge<N>) -> &'a N,
{
    let mut sums: HashMap<&N, f64> = HashMap::new();
    for edge in edges {
        *sums.entry(key(edge)).or_insert(0.0) += edge.count;
    }
    sums
}

/// Number of outgoing rows per `node1`.
pub(crate) fn out_degree<N: NodeId>(edges: &[Edge<N>]) -> HashMap<&N, usize> {
    let mut degrees: HashMap<&N, usize> = HashMap::new();
    for edge in edges {
        *degrees.entry(&edge.node1).or_insert(0) += 1;
    }
    degrees
}

/// Order-independent key for an unordered node pair.
#[inline]
pub(crate) fn canonical_pair<N: NodeId>(a: &N, b: &N) -> (N, N) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Drop self-loops unless they were asked for.
pub(crate) fn retain_self_loops<N: NodeId>(
    rows: Vec<ScoredEdge<N>>,
    include_self_loops: bool,
) -> Vec<ScoredEdge<N>> {
    if include_self_loops {
        return rows;
    }
    rows.into_iter().filter(|e| e.node1 != e.node2).collect()
}

/// Collapse rows to one per unordered pair.
///
/// The surviving row is the first occurrence of the pair; `merge` folds
/// every later occurrence into it.
pub(crate) fn collapse_undirected<N, F>(rows: Vec<ScoredEdge<N>>, mut merge: F) -> Vec<ScoredEdge<N>>
where
    N: NodeId,
    F: FnMut(&mut ScoredEdge<N>, &ScoredEdge<N>),
{
    let mut slots: HashMap<(N, N), usize> = HashMap::new();
    let mut collapsed: Vec<ScoredEdge<N>> = Vec::new();

    for row in rows {
        let key = canonical_pair(&row.node1, &row.node2);
        match slots.get(&key) {
            Some(&slot) => merge(&mut collapsed[slot], &row),
            None => {
                slots.insert(key, collapsed.len());
                collapsed.push(row);
            }
        }
    }

    collapsed
}
