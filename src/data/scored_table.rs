//! Scored edge tables produced by the backbone methods.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output column of a scored table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Node1,
    Node2,
    Count,
    Score,
    Variance,
    Sdev,
}

impl Column {
    /// Header name used when writing the table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Node1 => "node1",
            Self::Node2 => "node2",
            Self::Count => "count",
            Self::Score => "score",
            Self::Variance => "variance",
            Self::Sdev => "sdev",
        }
    }

    /// `node1, node2, count, score`
    pub const BASE: [Column; 4] = [Self::Node1, Self::Node2, Self::Count, Self::Score];

    /// `node1, node2, count, score, sdev`
    pub const WITH_SDEV: [Column; 5] = [
        Self::Node1,
        Self::Node2,
        Self::Count,
        Self::Score,
        Self::Sdev,
    ];

    /// `node1, node2, count, score, variance, sdev`
    pub const WITH_VARIANCE: [Column; 6] = [
        Self::Node1,
        Self::Node2,
        Self::Count,
        Self::Score,
        Self::Variance,
        Self::Sdev,
    ];
}

/// A scored edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEdge<N = String> {
    pub node1: N,
    pub node2: N,
    /// Original observed count.
    pub count: f64,
    /// Method-specific significance score.
    pub score: f64,
    /// Variance of the score, when the method estimates it.
    pub variance: Option<f64>,
    /// Standard deviation of the score, when the method estimates it.
    pub sdev: Option<f64>,
}

impl<N> ScoredEdge<N> {
    /// Edge with a score and no uncertainty estimate.
    pub fn new(node1: N, node2: N, count: f64, score: f64) -> Self {
        Self {
            node1,
            node2,
            count,
            score,
            variance: None,
            sdev: None,
        }
    }

    /// Attach a standard deviation.
    pub fn with_sdev(mut self, sdev: f64) -> Self {
        self.sdev = Some(sdev);
        self
    }

    /// Attach a variance and its square root as standard deviation.
    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = Some(variance);
        self.sdev = Some(variance.sqrt());
        self
    }
}

/// Result table of a scoring or thresholding call.
///
/// `columns` is the layout the producing operation emits, in order. Rows
/// never share storage with the table they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTable<N = String> {
    columns: Vec<Column>,
    edges: Vec<ScoredEdge<N>>,
}

impl<N> ScoredTable<N> {
    /// Create a table with the given column layout.
    pub fn new(columns: Vec<Column>, edges: Vec<ScoredEdge<N>>) -> Self {
        Self { columns, edges }
    }

    /// Column layout, in output order.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in output order.
    #[inline]
    pub fn edges(&self) -> &[ScoredEdge<N>] {
        &self.edges
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

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredEdge<N>> {
        self.edges.iter()
    }

    /// Whether rows carry a standard deviation that thresholding must honour.
    ///
    /// Thresholded tables no longer emit the `sdev` column but keep the
    /// value on each surviving row, so this also holds for them.
    pub fn has_sdev(&self) -> bool {
        self.columns.contains(&Column::Sdev) || self.edges.iter().any(|e| e.sdev.is_some())
    }

    /// Scores in row order.
    pub fn scores(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.score).collect()
    }

    /// Consume the table, returning its rows.
    pub fn into_edges(self) -> Vec<ScoredEdge<N>> {
        self.edges
    }
}

impl<N: PartialEq> ScoredTable<N> {
    /// First row with exactly this orientation.
    pub fn find(&self, node1: &N, node2: &N) -> Option<&ScoredEdge<N>> {
        self.edges
            .iter()
            .find(|e| &e.node1 == node1 && &e.node2 == node2)
    }

    /// First row connecting the two nodes in either orientation.
    pub fn find_undirected(&self, a: &N, b: &N) -> Option<&ScoredEdge<N>> {
        self.edges.iter().find(|e| {
            (&e.node1 == a && &e.node2 == b) || (&e.node1 == b && &e.node2 == a)
        })
    }
}

impl<N: Display> ScoredTable<N> {
    /// Write the table to a TSV file using its column layout.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_delimited(File::create(path)?, b'\t')
    }

    /// Write the table to a CSV file using its column layout.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_delimited(File::create(path)?, b',')
    }

    /// Write the table to any writer with the given delimiter.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        wtr.write_record(self.columns.iter().map(|c| c.name()))?;
        for edge in &self.edges {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| match column {
                    Column::Node1 => edge.node1.to_string(),
                    Column::Node2 => edge.node2.to_string(),
                    Column::Count => edge.count.to_string(),
                    Column::Score => edge.score.to_string(),
                    Column::Variance => edge.variance.map(|v| v.to_string()).unwrap_or_default(),
                    Column::Sdev => edge.sdev.map(|v| v.to_string()).unwrap_or_default(),
                })
                .collect();
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_table() -> ScoredTable {
        ScoredTable::new(
            Column::WITH_VARIANCE.to_vec(),
            vec![
                ScoredEdge::new("A".to_string(), "B".to_string(), 3.0, 0.5).with_variance(0.25),
                ScoredEdge::new("B".to_string(), "C".to_string(), 1.0, 0.1).with_variance(0.01),
            ],
        )
    }

    #[test]
    fn test_with_variance_sets_sdev() {
        let edge = ScoredEdge::new("A", "B", 1.0, 0.2).with_variance(0.09);
        assert_eq!(edge.variance, Some(0.09));
        assert!((edge.sdev.unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_has_sdev() {
        assert!(sample_table().has_sdev());

        let plain: ScoredTable<&str> =
            ScoredTable::new(Column::BASE.to_vec(), vec![ScoredEdge::new("A", "B", 1.0, 1.0)]);
        assert!(!plain.has_sdev());

        // Layout without sdev, rows still carrying it.
        let retained: ScoredTable<&str> = ScoredTable::new(
            Column::BASE.to_vec(),
            vec![ScoredEdge::new("A", "B", 1.0, 1.0).with_sdev(0.1)],
        );
        assert!(retained.has_sdev());
    }

    #[test]
    fn test_find() {
        let table = sample_table();
        let a = "A".to_string();
        let b = "B".to_string();
        assert!(table.find(&a, &b).is_some());
        assert!(table.find(&b, &a).is_none());
        assert!(table.find_undirected(&b, &a).is_some());
    }

    #[test]
    fn test_write_layout() {
        let table = sample_table();
        let mut buf = Vec::new();
        table.write_delimited(&mut buf, b'\t').unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("node1\tnode2\tcount\tscore\tvariance\tsdev"));
        assert_eq!(lines.next(), Some("A\tB\t3\t0.5\t0.25\t0.5"));
    }

    #[test]
    fn test_write_base_layout_drops_uncertainty() {
        let table = ScoredTable::new(
            Column::BASE.to_vec(),
            vec![ScoredEdge::new("A", "B", 2.0, 4.0).with_sdev(0.5)],
        );
        let file = NamedTempFile::new().unwrap();
        table.to_csv(file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "node1,node2,count,score\nA,B,2,4\n");
    }
}
