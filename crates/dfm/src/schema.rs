//! The DFM schema builder.
//!
//! A [`Schema`] translates DFM vocabulary (facts, dimensions, hierarchies,
//! convergence points, optional and descriptive attributes) into nodes and
//! edges of its [`DiagramGraph`], styled from its [`Presets`].
//!
//! Every operation validates its input and its attach points before touching
//! the graph, so a failed call leaves the schema exactly as it was.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use dfm_core::{
    attributes::{AttrValue, Attributes},
    fact::Fact,
    preset::{ElementKind, Presets},
};

use crate::{config::AppConfig, error::DfmError, export::dot, structure::DiagramGraph};

/// Builder for a single DFM diagram.
///
/// # Examples
///
/// ```rust,no_run
/// use dfm::Schema;
///
/// let mut schema = Schema::with_defaults().expect("Failed to create schema");
///
/// schema.create_fact("Sales", &["quantity", "revenue"])?;
/// schema.add_sequence_dimension(&["date", "month", "year"], "Sales")?;
/// schema.add_hierarchy(&["week"], "date", "year")?;
/// schema.add_descriptive("holiday", "date")?;
///
/// let path = schema.render_diagram()?;
/// println!("Diagram written to {}", path.display());
/// # Ok::<(), dfm::DfmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    graph: DiagramGraph,
    presets: Presets,
    output_path: PathBuf,
}

impl Schema {
    /// Create a new schema with an empty graph.
    ///
    /// The graph-level layout directives are read from the bootstrap document
    /// built from the layout configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Output, layout and preset configuration
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::Bootstrap`] if the bootstrap document cannot be
    /// parsed into a directed graph.
    pub fn new(config: &AppConfig) -> Result<Self, DfmError> {
        let document = config.layout().bootstrap_document();
        let graph_attributes = dot::bootstrap(&document)?;

        info!(
            layout_engine = config.layout().engine(),
            output_path = config.output().path().display().to_string();
            "Schema created"
        );

        Ok(Self {
            graph: DiagramGraph::new(graph_attributes),
            presets: config.presets().clone(),
            output_path: config.output().path().to_path_buf(),
        })
    }

    /// Create a new schema from the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::Bootstrap`] if the default bootstrap document
    /// cannot be parsed.
    pub fn with_defaults() -> Result<Self, DfmError> {
        Self::new(&AppConfig::default())
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    /// Returns the attribute presets used by this schema.
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// Returns the configured output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Create a fact and render it into the schema.
    ///
    /// An empty attribute list is accepted and renders a header-only table.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] if `title` or any attribute name is
    /// empty.
    pub fn create_fact<S: AsRef<str>>(
        &mut self,
        title: &str,
        attributes: &[S],
    ) -> Result<Fact, DfmError> {
        validate_label(title, "fact title")?;
        for attribute in attributes {
            validate_label(attribute.as_ref(), "fact attribute")?;
        }

        let fact = Fact::new(title, attributes);
        self.render_fact(&fact)?;
        Ok(fact)
    }

    /// Render a fact as a node whose label is its attribute table.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] if the fact name is empty.
    pub fn render_fact(&mut self, fact: &Fact) -> Result<(), DfmError> {
        validate_label(fact.name(), "fact title")?;

        let attributes = self
            .presets
            .instantiate(ElementKind::Fact)
            .with("label", AttrValue::html(fact.table_label()));

        debug!(
            fact = fact.name(),
            attributes_count = fact.attributes().len();
            "Rendering fact"
        );
        self.insert_node(fact.name(), attributes);
        Ok(())
    }

    /// Add a dimension attached to an existing node.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] for an empty label and
    /// [`DfmError::DanglingReference`] if `attach` does not exist.
    pub fn add_dimension(&mut self, label: &str, attach: &str) -> Result<(), DfmError> {
        validate_label(label, "dimension label")?;
        self.require_node(attach, "add_dimension")?;

        debug!(label, attach; "Adding dimension");
        self.attach_dimension(label, attach)
    }

    /// Add a chain of dimensions.
    ///
    /// The first label attaches to `start_attach`, every following label to
    /// the one before it.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] if `labels` is empty or holds an empty
    /// label, and [`DfmError::DanglingReference`] if `start_attach` does not
    /// exist.
    pub fn add_sequence_dimension<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        start_attach: &str,
    ) -> Result<(), DfmError> {
        validate_labels(labels, "dimension sequence")?;
        self.require_node(start_attach, "add_sequence_dimension")?;

        debug!(labels_count = labels.len(), start_attach; "Adding dimension sequence");
        let mut attach = start_attach;
        for label in labels {
            let label = label.as_ref();
            self.attach_dimension(label, attach)?;
            attach = label;
        }
        Ok(())
    }

    /// Add a convergence point attached to an existing node.
    ///
    /// The connecting edge carries no attributes so that several incoming
    /// paths merge visually.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] for an empty label and
    /// [`DfmError::DanglingReference`] if `attach` does not exist.
    pub fn add_convergence(&mut self, label: &str, attach: &str) -> Result<(), DfmError> {
        validate_label(label, "convergence label")?;
        self.require_node(attach, "add_convergence")?;

        debug!(label, attach; "Adding convergence");
        let node = self
            .presets
            .instantiate(ElementKind::Dimension)
            .with("xlabel", label);
        self.insert_node(label, node);
        self.graph.add_edge(attach, label, Attributes::new())?;
        Ok(())
    }

    /// Add a hierarchy with one edge per level from `from` to `to`.
    ///
    /// The node `to` is created, or overwritten if it already exists, and
    /// displays its own name. Each level becomes a separate parallel edge
    /// labelled with the level name.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] if `levels` is empty or holds an empty
    /// name, or `to` is empty, and [`DfmError::DanglingReference`] if `from`
    /// does not exist.
    pub fn add_hierarchy<S: AsRef<str>>(
        &mut self,
        levels: &[S],
        from: &str,
        to: &str,
    ) -> Result<(), DfmError> {
        validate_labels(levels, "hierarchy levels")?;
        validate_label(to, "hierarchy target")?;
        self.require_node(from, "add_hierarchy")?;

        debug!(levels_count = levels.len(), from, to; "Adding hierarchy");
        let node = self
            .presets
            .instantiate(ElementKind::Dimension)
            .with("label", to);
        self.insert_node(to, node);

        for level in levels {
            let level: &str = level.as_ref();
            let edge = self
                .presets
                .instantiate(ElementKind::Hierarchy)
                .with("xlabel", level);
            self.graph.add_edge(from, to, edge)?;
        }
        Ok(())
    }

    /// Add an optional dimension attached to an existing node.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] for an empty label and
    /// [`DfmError::DanglingReference`] if `attach` does not exist.
    pub fn add_optional(&mut self, label: &str, attach: &str) -> Result<(), DfmError> {
        validate_label(label, "optional label")?;
        self.require_node(attach, "add_optional")?;

        debug!(label, attach; "Adding optional dimension");
        let node = self
            .presets
            .instantiate(ElementKind::Dimension)
            .with("xlabel", label);
        self.insert_node(label, node);

        let edge = self.presets.instantiate(ElementKind::Optional);
        self.graph.add_edge(attach, label, edge)?;
        Ok(())
    }

    /// Add a descriptive attribute hanging off an existing node.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] for an empty label and
    /// [`DfmError::DanglingReference`] if `to` does not exist.
    pub fn add_descriptive(&mut self, label: &str, to: &str) -> Result<(), DfmError> {
        validate_label(label, "descriptive label")?;
        self.require_node(to, "add_descriptive")?;

        debug!(label, to; "Adding descriptive attribute");
        self.attach_descriptive(label, to)
    }

    /// Add several descriptive attributes to the same node.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::InvalidSpec`] if `labels` is empty or holds an empty
    /// label, and [`DfmError::DanglingReference`] if `to` does not exist.
    pub fn add_sequence_descriptive<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        to: &str,
    ) -> Result<(), DfmError> {
        validate_labels(labels, "descriptive sequence")?;
        self.require_node(to, "add_sequence_descriptive")?;

        debug!(labels_count = labels.len(), to; "Adding descriptive sequence");
        for label in labels {
            self.attach_descriptive(label.as_ref(), to)?;
        }
        Ok(())
    }

    /// Serialize the whole diagram to DOT text.
    pub fn to_dot(&self) -> String {
        let output = dot::print(&self.graph);
        trace!(output; "Serialized diagram");
        output
    }

    /// Write the diagram to the configured output path.
    ///
    /// Any previous content of the file is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::Persistence`] if the file cannot be written. The
    /// schema is unchanged and can be rendered again.
    pub fn render_diagram(&self) -> Result<PathBuf, DfmError> {
        self.render_diagram_to(&self.output_path)?;
        Ok(self.output_path.clone())
    }

    /// Write the diagram to `path`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`DfmError::Persistence`] if the file cannot be written.
    pub fn render_diagram_to(&self, path: impl AsRef<Path>) -> Result<(), DfmError> {
        let path = path.as_ref();
        let output = self.to_dot();

        fs::write(path, &output).map_err(|source| DfmError::Persistence {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            output_path = path.display().to_string(),
            nodes_count = self.graph.nodes_count(),
            edges_count = self.graph.edges_count();
            "Diagram rendered"
        );
        Ok(())
    }

    fn attach_dimension(&mut self, label: &str, attach: &str) -> Result<(), DfmError> {
        let node = self
            .presets
            .instantiate(ElementKind::Dimension)
            .with("xlabel", label)
            .with("fixedsize", "true");
        self.insert_node(label, node);

        let edge = self.presets.instantiate(ElementKind::Edge);
        self.graph.add_edge(attach, label, edge)?;
        Ok(())
    }

    fn attach_descriptive(&mut self, label: &str, to: &str) -> Result<(), DfmError> {
        let node = self.presets.instantiate(ElementKind::Descriptive);
        self.insert_node(label, node);

        let edge = self.presets.instantiate(ElementKind::Edge);
        self.graph.add_edge(to, label, edge)?;
        Ok(())
    }

    fn insert_node(&mut self, label: &str, attributes: Attributes) {
        trace!(label, attributes:?; "Adding node");
        if self.graph.add_node(label, attributes) {
            debug!(label; "Replaced attributes of existing node");
        }
    }

    fn require_node(&self, label: &str, operation: &'static str) -> Result<(), DfmError> {
        if self.graph.contains_node(label) {
            Ok(())
        } else {
            Err(DfmError::dangling(label, operation))
        }
    }
}

fn validate_label(label: &str, what: &str) -> Result<(), DfmError> {
    if label.trim().is_empty() {
        return Err(DfmError::InvalidSpec(format!("{what} must not be empty")));
    }
    Ok(())
}

fn validate_labels<S: AsRef<str>>(labels: &[S], what: &str) -> Result<(), DfmError> {
    if labels.is_empty() {
        return Err(DfmError::InvalidSpec(format!(
            "{what} requires at least one label"
        )));
    }
    labels
        .iter()
        .try_for_each(|label| validate_label(label.as_ref(), what))
}
