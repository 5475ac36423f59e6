//! Maximum spanning tree backbone.
//!
//! Counts are turned into distances (`1 / count`) and a minimum spanning
//! forest is grown with Kruskal's algorithm, which keeps the heaviest edges
//! that do not close a cycle. The graph is built, consumed and dropped
//! inside a single call.

use crate::data::{Column, EdgeTable, NodeId, ScoredEdge, ScoredTable};
use crate::score::aggregate::collapse_undirected;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;
use tracing::debug;

/// Undirected edge of the transient graph.
#[derive(Debug, Clone, Copy)]
struct GraphEdge {
    ends: (usize, usize),
    distance: f64,
    count: f64,
}

/// Transient weighted graph over interned node indices.
///
/// Repeated pairs collapse to a single edge: the last row wins for
/// attributes, the first row fixes the edge's position.
struct WeightedGraph<'a, N> {
    nodes: HashMap<&'a N, usize>,
    edges: Vec<GraphEdge>,
    slots: HashMap<(usize, usize), usize>,
}

impl<'a, N: NodeId> WeightedGraph<'a, N> {
    fn from_table(table: &'a EdgeTable<N>) -> Self {
        let mut graph = Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            slots: HashMap::new(),
        };
        for edge in table.iter() {
            let a = graph.intern(&edge.node1);
            let b = graph.intern(&edge.node2);
            let ends = (a.min(b), a.max(b));
            let weighted = GraphEdge {
                ends,
                distance: 1.0 / edge.count,
                count: edge.count,
            };
            match graph.slots.get(&ends) {
                Some(&slot) => graph.edges[slot] = weighted,
                None => {
                    graph.slots.insert(ends, graph.edges.len());
                    graph.edges.push(weighted);
                }
            }
        }
        graph
    }

    fn intern(&mut self, node: &'a N) -> usize {
        let next = self.nodes.len();
        *self.nodes.entry(node).or_insert(next)
    }

    fn index(&self, node: &N) -> Option<usize> {
        self.nodes.get(node).copied()
    }

    /// Kruskal minimum spanning forest by distance.
    ///
    /// Equal distances are taken in first-seen order. Returns the selected
    /// edges keyed by their endpoints.
    fn minimum_spanning_forest(&self) -> HashMap<(usize, usize), GraphEdge> {
        let mut order: Vec<usize> = (0..self.edges.len()).collect();
        order.sort_by(|&a, &b| self.edges[a].distance.total_cmp(&self.edges[b].distance));

        let mut components = UnionFind::<usize>::new(self.nodes.len());
        let mut forest = HashMap::new();
        for slot in order {
            let edge = self.edges[slot];
            if components.union(edge.ends.0, edge.ends.1) {
                forest.insert(edge.ends, edge);
            }
        }
        forest
    }
}

/// Keep only the edges of the maximum spanning forest.
///
/// Every input row whose unordered pair is a forest edge survives with its
/// own count; its score is the distance (`1 / count`) of the forest edge.
/// Disconnected input yields one tree per component. In undirected mode the
/// first row of each pair is kept. Tie order between equal counts is an
/// implementation detail and not stable across equivalent graphs.
///
/// A smaller score means a stronger edge. Thresholding this output with
/// [`threshold`](crate::filter::threshold) therefore keeps the weakest tree
/// edges; filter on `count` to keep the strongest ones.
///
/// Columns: `node1, node2, count, score`.
pub fn maximum_spanning_tree<N: NodeId>(table: &EdgeTable<N>, undirected: bool) -> ScoredTable<N> {
    debug!("Calculating MST score on {} edges", table.len());

    let graph = WeightedGraph::from_table(table);
    let mut forest = graph.minimum_spanning_forest();
    forest.retain(|_, edge| edge.count > 0.0);

    let mut rows: Vec<ScoredEdge<N>> = Vec::new();
    for edge in table.iter() {
        let (Some(a), Some(b)) = (graph.index(&edge.node1), graph.index(&edge.node2)) else {
            continue;
        };
        if let Some(tree_edge) = forest.get(&(a.min(b), a.max(b))) {
            rows.push(ScoredEdge::new(
                edge.node1.clone(),
                edge.node2.clone(),
                edge.count,
                tree_edge.distance,
            ));
        }
    }

    if undirected {
        rows = collapse_undirected(rows, |_, _| {});
    }

    ScoredTable::new(Column::BASE.to_vec(), rows)
}
