//! Integration tests for the Schema API
//!
//! These tests build diagrams through the public API and inspect the
//! emitted DOT text by parsing it back with the graphviz parser.

use std::fs;

use dot_structures::{Attribute, EdgeTy, Graph, Id, Stmt, Vertex};
use proptest::prelude::*;
use tempfile::tempdir;

use dfm::{
    DfmError, Schema,
    config::{AppConfig, LayoutConfig, OutputConfig, Presets},
};

/// A node or edge statement read back from DOT output.
#[derive(Debug)]
struct Statement {
    ids: Vec<String>,
    attributes: Vec<(String, String)>,
}

impl Statement {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn id_text(id: &Id) -> String {
    match id {
        Id::Escaped(quoted) => unquote(quoted),
        Id::Html(value) | Id::Plain(value) | Id::Anonymous(value) => value.clone(),
    }
}

/// Strips the surrounding quotes and decodes `\\` and `\"` escapes.
fn unquote(quoted: &str) -> String {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(quoted);

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match (ch, chars.clone().next()) {
            ('\\', Some(next @ ('\\' | '"'))) => {
                text.push(next);
                chars.next();
            }
            _ => text.push(ch),
        }
    }
    text
}

fn attributes(attrs: &[Attribute]) -> Vec<(String, String)> {
    attrs
        .iter()
        .map(|Attribute(key, value)| (id_text(key), id_text(value)))
        .collect()
}

fn vertex_text(vertex: &Vertex) -> String {
    match vertex {
        Vertex::N(node_id) => id_text(&node_id.0),
        Vertex::S(_) => panic!("unexpected subgraph vertex"),
    }
}

/// Parses DOT output into its node and edge statements.
fn statements(dot: &str) -> (Vec<Statement>, Vec<Statement>) {
    let graph = graphviz_rust::parse(dot).expect("Output should be valid DOT");
    let Graph::DiGraph { stmts, .. } = graph else {
        panic!("Output should be a digraph");
    };

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for stmt in stmts {
        match stmt {
            Stmt::Node(node) => nodes.push(Statement {
                ids: vec![id_text(&node.id.0)],
                attributes: attributes(&node.attributes),
            }),
            Stmt::Edge(edge) => {
                let ids = match &edge.ty {
                    EdgeTy::Pair(source, target) => vec![vertex_text(source), vertex_text(target)],
                    EdgeTy::Chain(chain) => chain.iter().map(vertex_text).collect(),
                };
                edges.push(Statement {
                    ids,
                    attributes: attributes(&edge.attributes),
                });
            }
            _ => {}
        }
    }
    (nodes, edges)
}

fn schema_with_fact() -> Schema {
    let mut schema = Schema::with_defaults().expect("Failed to create schema");
    schema
        .create_fact("Fact1", &["qty", "price"])
        .expect("Failed to create fact");
    schema
}

#[test]
fn test_output_declares_layout_directives() {
    let schema = Schema::with_defaults().expect("Failed to create schema");
    let dot = schema.to_dot();

    assert!(dot.starts_with("digraph G"));
    assert!(dot.contains("twopi"));
    assert!(dot.contains("prism"));
    assert!(dot.contains("4.5"));
}

#[test]
fn test_add_dimension_emits_one_node_and_one_edge() {
    let mut schema = schema_with_fact();
    schema.add_dimension("store", "Fact1").unwrap();

    let (nodes, edges) = statements(&schema.to_dot());

    assert_eq!(nodes.iter().filter(|n| n.ids == ["store"]).count(), 1);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].ids, ["Fact1", "store"]);
}

#[test]
fn test_sequence_dimension_builds_chain() {
    let mut chained = schema_with_fact();
    chained
        .add_sequence_dimension(&["a", "b", "c"], "Fact1")
        .unwrap();

    let mut stepwise = schema_with_fact();
    stepwise.add_dimension("a", "Fact1").unwrap();
    stepwise.add_dimension("b", "a").unwrap();
    stepwise.add_dimension("c", "b").unwrap();

    assert_eq!(chained.to_dot(), stepwise.to_dot());

    let (nodes, edges) = statements(&chained.to_dot());
    assert_eq!(nodes.len(), 4);
    let pairs: Vec<Vec<String>> = edges.into_iter().map(|e| e.ids).collect();
    assert_eq!(
        pairs,
        [["Fact1", "a"], ["a", "b"], ["b", "c"]]
            .map(|pair| pair.map(String::from).to_vec())
            .to_vec()
    );
}

#[test]
fn test_single_element_sequence_matches_add_dimension() {
    let mut chained = schema_with_fact();
    chained.add_sequence_dimension(&["a"], "Fact1").unwrap();

    let mut single = schema_with_fact();
    single.add_dimension("a", "Fact1").unwrap();

    assert_eq!(chained.to_dot(), single.to_dot());
}

#[test]
fn test_hierarchy_keeps_parallel_edges() {
    let mut schema = schema_with_fact();
    schema.add_dimension("from", "Fact1").unwrap();
    schema.add_hierarchy(&["L1", "L2"], "from", "to").unwrap();

    let (nodes, edges) = statements(&schema.to_dot());

    assert_eq!(nodes.iter().filter(|n| n.ids == ["to"]).count(), 1);

    let hierarchy: Vec<&Statement> = edges.iter().filter(|e| e.ids == ["from", "to"]).collect();
    assert_eq!(hierarchy.len(), 2);
    assert_eq!(hierarchy[0].attribute("xlabel"), Some("L1"));
    assert_eq!(hierarchy[1].attribute("xlabel"), Some("L2"));
    assert_eq!(hierarchy[0].attribute("arrowhead"), Some("none"));
}

#[test]
fn test_fact_renders_table_label() {
    let mut schema = Schema::with_defaults().unwrap();
    schema.create_fact("Sales", &["qty", "price"]).unwrap();

    let (nodes, _) = statements(&schema.to_dot());
    assert_eq!(nodes.len(), 1);

    let sales = &nodes[0];
    assert_eq!(sales.ids, ["Sales"]);
    assert_eq!(sales.attribute("shape"), Some("plain"));

    let label = sales.attribute("label").expect("Fact should have a label");
    assert!(label.contains("<table"));
    let header = label.find(r#"<td bgcolor="lightblue">Sales</td>"#).unwrap();
    let qty = label.find("<td>qty</td>").unwrap();
    let price = label.find("<td>price</td>").unwrap();
    assert!(header < qty && qty < price);
}

#[test]
fn test_html_label_is_not_quoted() {
    let mut schema = Schema::with_defaults().unwrap();
    schema.create_fact("Sales", &["qty"]).unwrap();

    let dot = schema.to_dot();
    assert!(dot.contains("<<table"));
    assert!(!dot.contains("\"<table"));
}

#[test]
fn test_optional_does_not_leak_into_dimension_edge() {
    let mut schema = schema_with_fact();
    schema.add_optional("x", "Fact1").unwrap();
    schema.add_dimension("y", "Fact1").unwrap();

    let (nodes, edges) = statements(&schema.to_dot());

    let to_x = edges.iter().find(|e| e.ids == ["Fact1", "x"]).unwrap();
    let to_y = edges.iter().find(|e| e.ids == ["Fact1", "y"]).unwrap();
    assert_eq!(to_x.attribute("arrowhead"), Some("icurve"));
    assert_eq!(to_y.attribute("arrowhead"), Some("none"));

    let x = nodes.iter().find(|n| n.ids == ["x"]).unwrap();
    assert_eq!(x.attribute("xlabel"), Some("x"));
    assert_eq!(x.attribute("fixedsize"), None);
}

#[test]
fn test_earlier_nodes_keep_their_labels() {
    let mut schema = schema_with_fact();
    schema.add_dimension("first", "Fact1").unwrap();
    schema.add_dimension("second", "Fact1").unwrap();

    let (nodes, _) = statements(&schema.to_dot());
    let first = nodes.iter().find(|n| n.ids == ["first"]).unwrap();
    assert_eq!(first.attribute("xlabel"), Some("first"));
}

#[test]
fn test_convergence_edge_is_bare() {
    let mut schema = schema_with_fact();
    schema.add_dimension("a", "Fact1").unwrap();
    schema.add_convergence("c", "a").unwrap();

    let (_, edges) = statements(&schema.to_dot());
    let edge = edges.iter().find(|e| e.ids == ["a", "c"]).unwrap();
    assert!(edge.attributes.is_empty());
}

#[test]
fn test_labels_with_spaces_are_quoted() {
    let mut schema = Schema::with_defaults().unwrap();
    schema.create_fact("Daily Sales", &["unit price"]).unwrap();
    schema.add_dimension("sales region", "Daily Sales").unwrap();

    let (_, edges) = statements(&schema.to_dot());
    assert_eq!(edges[0].ids, ["Daily Sales", "sales region"]);
}

#[test]
fn test_labels_with_backslashes_and_quotes_stay_parseable() {
    let labels = [r"C:\", r#"say "hi""#, r#"a\"b"#, r"\\server\share\"];

    let mut schema = schema_with_fact();
    for label in labels {
        schema.add_dimension(label, "Fact1").unwrap();
    }
    schema.add_descriptive(r"path\", r"C:\").unwrap();

    let (nodes, edges) = statements(&schema.to_dot());

    for label in labels {
        let node = nodes
            .iter()
            .find(|n| n.ids == [label])
            .unwrap_or_else(|| panic!("node {label} missing from output"));
        assert_eq!(node.attribute("xlabel"), Some(label));
    }
    assert_eq!(edges.len(), labels.len() + 1);
    assert_eq!(edges[labels.len()].ids, [r"C:\", r"path\"]);
}

#[test]
fn test_render_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.dot");
    let config = AppConfig::default().with_output_path(&path);

    let mut schema = Schema::new(&config).unwrap();
    schema.create_fact("Sales", &["qty"]).unwrap();
    schema.add_sequence_dimension(&["day", "month"], "Sales").unwrap();

    assert_eq!(schema.render_diagram().unwrap(), path);
    let first = fs::read(&path).unwrap();
    schema.render_diagram().unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_render_succeeds_on_write_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.dot");
    fs::write(&path, "previous diagram").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o200)).unwrap();

    let mut schema = schema_with_fact();
    schema.add_dimension("store", "Fact1").unwrap();
    let result = schema.render_diagram_to(&path);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    result.expect("Rendering must not need read access to the output file");
    assert_eq!(fs::read_to_string(&path).unwrap(), schema.to_dot());
}

#[test]
fn test_render_truncates_longer_stale_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.dot");
    fs::write(&path, "stale content that is never read ".repeat(100)).unwrap();

    let mut schema = schema_with_fact();
    schema.add_dimension("store", "Fact1").unwrap();
    schema.render_diagram_to(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), schema.to_dot());
}

#[test]
fn test_render_after_further_construction_updates_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.dot");

    let mut schema = schema_with_fact();
    schema.render_diagram_to(&path).unwrap();
    schema.add_dimension("store", "Fact1").unwrap();
    schema.render_diagram_to(&path).unwrap();

    let (_, edges) = statements(&fs::read_to_string(&path).unwrap());
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_failed_write_can_be_retried_elsewhere() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("no_such_dir").join("diagram.dot");
    let good = dir.path().join("diagram.dot");

    let mut schema = schema_with_fact();
    schema.add_dimension("store", "Fact1").unwrap();

    let err = schema.render_diagram_to(&bad).unwrap_err();
    assert!(matches!(err, DfmError::Persistence { .. }));

    schema.render_diagram_to(&good).unwrap();
    let (nodes, edges) = statements(&fs::read_to_string(&good).unwrap());
    assert_eq!(nodes.len(), 2);
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_dangling_reference_is_reported() {
    let mut schema = schema_with_fact();
    let err = schema.add_optional("x", "Nowhere").unwrap_err();

    assert!(matches!(err, DfmError::DanglingReference { ref label, .. } if label == "Nowhere"));
    assert!(err.to_string().contains("Nowhere"));
}

#[test]
fn test_invalid_layout_fails_bootstrap() {
    let config = AppConfig::new(
        OutputConfig::default(),
        LayoutConfig::new("two words", "prism", 4.5),
        Presets::default(),
    );

    let result = Schema::new(&config);
    assert!(matches!(result, Err(DfmError::Bootstrap(_))));
}

#[test]
fn test_custom_layout_is_emitted() {
    let config = AppConfig::new(
        OutputConfig::default(),
        LayoutConfig::new("circo", "scale", 2.0),
        Presets::default(),
    );

    let schema = Schema::new(&config).unwrap();
    let dot = schema.to_dot();
    assert!(dot.contains("circo"));
    assert!(dot.contains("scale"));
}

#[test]
fn test_independent_schemas_share_nothing() {
    let mut first = schema_with_fact();
    let second = schema_with_fact();

    first.add_dimension("store", "Fact1").unwrap();

    assert!(first.graph().contains_node("store"));
    assert!(!second.graph().contains_node("store"));
}

proptest! {
    #[test]
    fn prop_add_dimension_single_node_and_edge(label in "[a-z][a-z0-9_]{0,10}") {
        let mut schema = schema_with_fact();
        schema.add_dimension(&label, "Fact1").unwrap();

        let (nodes, edges) = statements(&schema.to_dot());

        prop_assert_eq!(nodes.iter().filter(|n| n.ids == [label.as_str()]).count(), 1);
        prop_assert_eq!(edges.len(), 1);
        prop_assert_eq!(&edges[0].ids, &vec!["Fact1".to_string(), label.clone()]);
    }

    #[test]
    fn prop_sequence_dimension_edge_count(labels in prop::collection::hash_set("[a-z]{1,6}", 1..6)) {
        let labels: Vec<String> = labels.into_iter().collect();
        let mut schema = schema_with_fact();
        schema.add_sequence_dimension(&labels, "Fact1").unwrap();

        prop_assert_eq!(schema.graph().edges_count(), labels.len());
        prop_assert_eq!(schema.graph().nodes_count(), labels.len() + 1);
    }
}
