//! Edge tables consumed and produced by the backbone methods.

mod edge_table;
mod scored_table;

pub use edge_table::{Edge, EdgeTable, NodeId};
pub use scored_table::{Column, ScoredEdge, ScoredTable};
