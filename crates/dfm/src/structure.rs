//! Graph structures backing a DFM schema.
//!
//! The [`DiagramGraph`] stores every node and edge a schema creates, in
//! creation order, together with the graph-level layout attributes.

mod graph;

pub use graph::{DiagramGraph, Edge, EdgeIndex};
