//! Directed multigraph holding the diagram's nodes and edges.
//!
//! [`DiagramGraph`] is the backend every schema operation writes into. It
//! stores:
//! - Nodes keyed by label, each carrying an [`Attributes`] set
//! - Edges between existing nodes, each carrying its own [`Attributes`]
//! - Graph-level attributes seeded from the bootstrap document
//!
//! Nodes and edges are kept in creation order so that serialization is
//! deterministic. Multiple edges between the same pair of nodes are allowed.

use std::collections::HashMap;

use indexmap::IndexMap;

use dfm_core::attributes::{AttrValue, Attributes};

use crate::error::DfmError;

/// Index of an edge in a [`DiagramGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    fn new(index: usize) -> Self {
        EdgeIndex(index)
    }

    /// Returns the position of the edge in creation order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A directed edge between two node labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: String,
    target: String,
    attributes: Attributes,
}

impl Edge {
    fn new(source: &str, target: &str, attributes: Attributes) -> Self {
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            attributes,
        }
    }

    /// Returns the label of the source node.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the label of the target node.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the visual attributes of the edge.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Directed multigraph of labelled nodes and attributed edges.
#[derive(Debug, Clone, Default)]
pub struct DiagramGraph {
    graph_attributes: Attributes,
    nodes: IndexMap<String, Attributes>,
    edges: Vec<Edge>,
    outgoing_edges: HashMap<String, Vec<EdgeIndex>>,
}

impl DiagramGraph {
    /// Creates an empty graph carrying the given graph-level attributes.
    pub fn new(graph_attributes: Attributes) -> Self {
        DiagramGraph {
            graph_attributes,
            ..Default::default()
        }
    }

    /// Returns the graph-level attributes.
    pub fn graph_attributes(&self) -> &Attributes {
        &self.graph_attributes
    }

    /// Sets a graph-level attribute.
    pub fn set_graph_attribute(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.graph_attributes.set(key, value);
    }

    /// Returns the attributes of the node with the given label, if it exists.
    pub fn node(&self, label: &str) -> Option<&Attributes> {
        self.nodes.get(label)
    }

    /// Iterates over nodes as `(label, attributes)` in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.nodes
            .iter()
            .map(|(label, attributes)| (label.as_str(), attributes))
    }

    /// Returns the total number of nodes in the graph.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a node with the given label exists in the graph.
    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains_key(label)
    }

    /// Returns the edge at the given index, if it exists.
    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.edges.get(idx.0)
    }

    /// Iterates over all edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns the total number of edges in the graph.
    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all edges going from `source` to `target`.
    pub fn edges_between<'a>(
        &'a self,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a Edge> {
        self.outgoing_edges
            .get(source)
            .into_iter()
            .flatten()
            .map(|idx| &self.edges[idx.0])
            .filter(move |edge| edge.target == target)
    }

    /// Iterates over the labels of nodes reached by outgoing edges of `source`.
    ///
    /// Parallel edges yield the same target once per edge.
    pub fn outgoing_nodes<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a str> {
        self.outgoing_edges
            .get(source)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].target.as_str())
    }

    /// Adds a node with the given label and attributes.
    ///
    /// If a node with the same label already exists, its attributes are
    /// replaced and it keeps its original position. Returns `true` when an
    /// existing node was replaced.
    pub fn add_node(&mut self, label: &str, attributes: Attributes) -> bool {
        self.nodes.insert(label.to_string(), attributes).is_some()
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::DanglingReference`] if either endpoint has not
    /// been added as a node. The graph is left unchanged in that case.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: Attributes,
    ) -> Result<EdgeIndex, DfmError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(DfmError::dangling(endpoint, "edge"));
            }
        }

        self.edges.push(Edge::new(source, target, attributes));

        let idx = EdgeIndex::new(self.edges.len() - 1);
        self.outgoing_edges
            .entry(source.to_string())
            .or_default()
            .push(idx);
        Ok(idx)
    }
}
