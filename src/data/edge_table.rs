//! Edge list of directed observations with non-negative weights.

use crate::error::{BackboneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::fs::File;
use std::hash::Hash;
use std::io::Read;
use std::path::Path;

/// Requirements on a node identifier.
///
/// Identifiers are opaque: they only need to be hashable for group-by
/// aggregation and totally ordered for canonical undirected pairs.
pub trait NodeId: Ord + Hash + Clone + Debug + Send + Sync {}

impl<T: Ord + Hash + Clone + Debug + Send + Sync> NodeId for T {}

/// A single directed observation `node1 -> node2` carrying `count` weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N = String> {
    pub node1: N,
    pub node2: N,
    pub count: f64,
}

impl<N> Edge<N> {
    pub fn new(node1: N, node2: N, count: f64) -> Self {
        Self {
            node1,
            node2,
            count,
        }
    }
}

impl<N: PartialEq> Edge<N> {
    /// True when both endpoints are the same node.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.node1 == self.node2
    }
}

/// In-memory edge table.
///
/// Rows keep their input order. `(node1, node2)` pairs may repeat; every
/// aggregation sums over repeated rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTable<N = String> {
    edges: Vec<Edge<N>>,
}

impl<N> EdgeTable<N> {
    /// Create a table from edges, validating counts up front.
    ///
    /// Fails on an empty edge list or on any count that is negative,
    /// NaN or infinite.
    pub fn new(edges: Vec<Edge<N>>) -> Result<Self> {
        if edges.is_empty() {
            return Err(BackboneError::EmptyData(
                "Edge table has no rows".to_string(),
            ));
        }
        for (row, edge) in edges.iter().enumerate() {
            if !edge.count.is_finite() || edge.count < 0.0 {
                return Err(BackboneError::InvalidCount {
                    value: edge.count.to_string(),
                    row,
                });
            }
        }
        Ok(Self { edges })
    }

    /// Build a table from `(node1, node2, count)` triples.
    pub fn from_triples<I, A>(triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, A, f64)>,
        A: Into<N>,
    {
        let edges = triples
            .into_iter()
            .map(|(a, b, count)| Edge::new(a.into(), b.into(), count))
            .collect();
        Self::new(edges)
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All rows in input order.
    #[inline]
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &Edge<N>> {
        self.edges.iter()
    }

    /// Sum of all counts (`n..`).
    pub fn total_count(&self) -> f64 {
        self.edges.iter().map(|e| e.count).sum()
    }

    /// Consume the table, returning its rows.
    pub fn into_edges(self) -> Vec<Edge<N>> {
        self.edges
    }
}

impl<N: NodeId> EdgeTable<N> {
    /// Number of distinct nodes appearing as either endpoint.
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| [&e.node1, &e.node2])
            .collect::<HashSet<_>>()
            .len()
    }
}

impl EdgeTable<String> {
    /// Load an edge table from a tab-separated file with a header row.
    ///
    /// The header must name `node1`, `node2` and `count` columns; their
    /// position does not matter and any other columns are ignored.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?, b'\t')
    }

    /// Load an edge table from a comma-separated file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?, b',')
    }

    /// Parse an edge table from any reader using the given delimiter.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| BackboneError::MissingColumn(name.to_string()))
        };
        let node1_idx = column("node1")?;
        let node2_idx = column("node2")?;
        let count_idx = column("count")?;

        let mut edges = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");
            let raw_count = field(count_idx);
            let count: f64 = raw_count
                .parse()
                .map_err(|_| BackboneError::InvalidCount {
                    value: raw_count.to_string(),
                    row,
                })?;
            edges.push(Edge::new(
                field(node1_idx).to_string(),
                field(node2_idx).to_string(),
                count,
            ));
        }

        Self::new(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_triples() {
        let table: EdgeTable = EdgeTable::from_triples([
            ("A", "B", 3.0),
            ("B", "A", 5.0),
            ("B", "C", 2.0),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.node_count(), 3);
        assert!((table.total_count() - 10.0).abs() < 1e-12);
        assert_eq!(table.edges()[1].node1, "B");
    }

    #[test]
    fn test_integer_node_ids() {
        let table: EdgeTable<u32> =
            EdgeTable::from_triples([(1u32, 2u32, 1.0), (2, 3, 4.0)]).unwrap();
        assert_eq!(table.node_count(), 3);
    }

    #[test]
    fn test_rejects_empty() {
        let result = EdgeTable::<String>::new(Vec::new());
        assert!(matches!(result, Err(BackboneError::EmptyData(_))));
    }

    #[test]
    fn test_rejects_bad_counts() {
        let negative = EdgeTable::<String>::from_triples([("A", "B", 1.0), ("B", "C", -2.0)]);
        assert!(matches!(
            negative,
            Err(BackboneError::InvalidCount { row: 1, .. })
        ));

        let nan = EdgeTable::<String>::from_triples([("A", "B", f64::NAN)]);
        assert!(nan.is_err());

        let inf = EdgeTable::<String>::from_triples([("A", "B", f64::INFINITY)]);
        assert!(inf.is_err());
    }

    #[test]
    fn test_self_loop() {
        assert!(Edge::new("A", "A", 1.0).is_self_loop());
        assert!(!Edge::new("A", "B", 1.0).is_self_loop());
    }

    #[test]
    fn test_from_tsv_any_column_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "count\tnode2\tnode1\tyear").unwrap();
        writeln!(file, "10\tB\tA\t2001").unwrap();
        writeln!(file, "4\tC\tB\t2001").unwrap();
        file.flush().unwrap();

        let table = EdgeTable::from_tsv(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.edges()[0], Edge::new("A".to_string(), "B".to_string(), 10.0));
        assert_eq!(table.edges()[1].count, 4.0);
    }

    #[test]
    fn test_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "node1,node2,count").unwrap();
        writeln!(file, "A,B,2.5").unwrap();
        file.flush().unwrap();

        let table = EdgeTable::from_csv(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!((table.edges()[0].count - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_column() {
        let data = "node1\tnode2\tweight\nA\tB\t1\n";
        let result = EdgeTable::from_reader(data.as_bytes(), b'\t');
        match result {
            Err(BackboneError::MissingColumn(name)) => assert_eq!(name, "count"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_count() {
        let data = "node1\tnode2\tcount\nA\tB\t1\nB\tC\tmany\n";
        let result = EdgeTable::from_reader(data.as_bytes(), b'\t');
        match result {
            Err(BackboneError::InvalidCount { value, row }) => {
                assert_eq!(value, "many");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidCount, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "node1\tnode2\tcount\n";
        let result = EdgeTable::from_reader(data.as_bytes(), b'\t');
        assert!(matches!(result, Err(BackboneError::EmptyData(_))));
    }
}
