//! DOT serialization through `graphviz-rust`.
//!
//! This module maps a [`DiagramGraph`] onto the `dot-structures` AST and
//! prints it with the `graphviz-rust` printer. It also reads the graph-level
//! directives of the bootstrap document used to seed a new graph.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::{debug, trace};

use dfm_core::attributes::{AttrValue, Attributes};

use crate::{error::DfmError, structure::DiagramGraph};

/// Identifier of the emitted digraph.
const GRAPH_ID: &str = "G";

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Reads the graph-level attributes of a bootstrap DOT document.
///
/// Both top-level `key=value` statements and `graph [...]` statements are
/// accepted. Later statements override earlier ones.
///
/// # Errors
///
/// Returns [`DfmError::Bootstrap`] if the document does not parse, is not a
/// `digraph`, or contains node, edge or subgraph statements.
pub fn bootstrap(document: &str) -> Result<Attributes, DfmError> {
    trace!(document; "Parsing bootstrap document");
    let graph = graphviz_rust::parse(document).map_err(DfmError::Bootstrap)?;

    let stmts = match graph {
        Graph::DiGraph { stmts, .. } => stmts,
        Graph::Graph { .. } => {
            return Err(DfmError::Bootstrap(
                "bootstrap document must declare a digraph".to_string(),
            ));
        }
    };

    let mut attributes = Attributes::new();
    for stmt in stmts {
        match stmt {
            Stmt::Attribute(attr) => insert_attribute(&mut attributes, attr),
            Stmt::GAttribute(GraphAttributes::Graph(attrs)) => {
                for attr in attrs {
                    insert_attribute(&mut attributes, attr);
                }
            }
            other => {
                return Err(DfmError::Bootstrap(format!(
                    "unexpected statement in bootstrap document: {other:?}"
                )));
            }
        }
    }

    debug!(attributes_count = attributes.len(); "Bootstrap document parsed");
    Ok(attributes)
}

/// Maps a [`DiagramGraph`] onto a `dot-structures` digraph.
///
/// Graph attributes come first, then node statements in creation order,
/// then edge statements in creation order.
pub fn to_dot_graph(graph: &DiagramGraph) -> Graph {
    let mut stmts =
        Vec::with_capacity(graph.graph_attributes().len() + graph.nodes_count() + graph.edges_count());

    stmts.extend(
        graph
            .graph_attributes()
            .iter()
            .map(|(key, value)| Stmt::Attribute(Attribute(text_id(key), value_id(value)))),
    );

    stmts.extend(graph.nodes().map(|(label, attributes)| {
        Stmt::Node(Node {
            id: node_id(label),
            attributes: attribute_list(attributes),
        })
    }));

    stmts.extend(graph.edges().map(|edge| {
        Stmt::Edge(DotEdge {
            ty: EdgeTy::Pair(
                Vertex::N(node_id(edge.source())),
                Vertex::N(node_id(edge.target())),
            ),
            attributes: attribute_list(edge.attributes()),
        })
    }));

    Graph::DiGraph {
        id: Id::Plain(GRAPH_ID.to_string()),
        strict: false,
        stmts,
    }
}

/// Serializes a [`DiagramGraph`] to DOT text.
pub fn print(graph: &DiagramGraph) -> String {
    to_dot_graph(graph).print(&mut PrinterContext::default())
}

fn insert_attribute(attributes: &mut Attributes, Attribute(key, value): Attribute) {
    let key = value_from_id(key);
    attributes.set(key.as_str(), value_from_id(value));
}

fn node_id(label: &str) -> NodeId {
    NodeId(text_id(label), None)
}

fn attribute_list(attributes: &Attributes) -> Vec<Attribute> {
    attributes
        .iter()
        .map(|(key, value)| Attribute(text_id(key), value_id(value)))
        .collect()
}

fn value_id(value: &AttrValue) -> Id {
    match value {
        AttrValue::Text(text) => text_id(text),
        AttrValue::Html(markup) => Id::Html(format!("<{markup}>")),
    }
}

/// Converts a string to a DOT identifier, quoting it unless it is a bare ID.
fn text_id(value: &str) -> Id {
    if is_bare_id(value) {
        Id::Plain(value.to_string())
    } else {
        Id::Escaped(format!("\"{}\"", escape_quoted(value)))
    }
}

/// Escapes backslashes and double quotes for a quoted DOT string.
fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if ch == '\\' || ch == '"' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Reverses [`escape_quoted`].
fn unescape_quoted(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next @ ('\\' | '"')) => unescaped.push(next),
                Some(next) => {
                    unescaped.push('\\');
                    unescaped.push(next);
                }
                None => unescaped.push('\\'),
            },
            _ => unescaped.push(ch),
        }
    }
    unescaped
}

fn value_from_id(id: Id) -> AttrValue {
    match id {
        Id::Html(markup) => {
            let inner = markup
                .strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
                .map(str::to_string)
                .unwrap_or(markup);
            AttrValue::Html(inner)
        }
        Id::Escaped(quoted) => {
            let inner = quoted
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(quoted.as_str());
            AttrValue::Text(unescape_quoted(inner))
        }
        Id::Plain(value) | Id::Anonymous(value) => AttrValue::Text(value),
    }
}

/// Returns `true` if `value` can be emitted without quotes.
fn is_bare_id(value: &str) -> bool {
    if KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(value))
    {
        return false;
    }
    is_identifier(value) || is_numeral(value)
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

fn is_numeral(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit());
    let integral_ok = |part: &str| all_digits(part) && (part == "0" || !part.starts_with('0'));

    match digits.split_once('.') {
        None => integral_ok(digits),
        Some(("", fraction)) => all_digits(fraction),
        Some((integral, fraction)) => integral_ok(integral) && all_digits(fraction),
    }
}
