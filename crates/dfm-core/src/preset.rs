//! Attribute presets for each kind of DFM element.
//!
//! A preset is an immutable template. Builders call [`Presets::instantiate`]
//! to obtain an owned copy and overlay per-element values on that copy, so
//! nodes and edges created earlier never observe later overlays.

use std::fmt;

use log::trace;
use serde::Deserialize;

use crate::attributes::Attributes;

/// The kind of DFM element a preset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Fact node holding the measure table.
    Fact,
    /// Generic dimension node, also used for convergence, optional and hierarchy nodes.
    Dimension,
    /// Plain dimensional edge.
    Edge,
    /// Descriptive attribute node.
    Descriptive,
    /// Optional relationship edge.
    Optional,
    /// Hierarchy level edge.
    Hierarchy,
}

impl ElementKind {
    /// All element kinds, in catalog order.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Fact,
        ElementKind::Dimension,
        ElementKind::Edge,
        ElementKind::Descriptive,
        ElementKind::Optional,
        ElementKind::Hierarchy,
    ];
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Fact => "fact",
            ElementKind::Dimension => "dimension",
            ElementKind::Edge => "edge",
            ElementKind::Descriptive => "descriptive",
            ElementKind::Optional => "optional",
            ElementKind::Hierarchy => "hierarchy",
        };
        write!(f, "{name}")
    }
}

/// Catalog of attribute presets, one per [`ElementKind`].
///
/// Each section can be overridden from configuration; a section that is
/// given replaces the whole default preset for that kind.
///
/// ```
/// use dfm_core::{attributes::AttrValue, preset::{ElementKind, Presets}};
///
/// let presets = Presets::default();
/// let edge = presets.instantiate(ElementKind::Optional);
/// assert_eq!(edge.get("arrowhead"), Some(&AttrValue::text("icurve")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Presets {
    fact: Attributes,
    dimension: Attributes,
    edge: Attributes,
    descriptive: Attributes,
    optional: Attributes,
    hierarchy: Attributes,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            fact: Attributes::from_pairs([("shape", "plain"), ("root", "true")]),
            dimension: Attributes::from_pairs([("shape", "circle"), ("label", "")]),
            edge: Attributes::from_pairs([("arrowhead", "none"), ("len", "0.5")]),
            descriptive: Attributes::from_pairs([("shape", "underline")]),
            optional: Attributes::from_pairs([("arrowhead", "icurve")]),
            hierarchy: Attributes::from_pairs([("arrowhead", "none")]),
        }
    }
}

impl Presets {
    /// Returns the template for `kind`.
    pub fn get(&self, kind: ElementKind) -> &Attributes {
        match kind {
            ElementKind::Fact => &self.fact,
            ElementKind::Dimension => &self.dimension,
            ElementKind::Edge => &self.edge,
            ElementKind::Descriptive => &self.descriptive,
            ElementKind::Optional => &self.optional,
            ElementKind::Hierarchy => &self.hierarchy,
        }
    }

    /// Returns a fresh, independently owned copy of the template for `kind`.
    pub fn instantiate(&self, kind: ElementKind) -> Attributes {
        let attributes = self.get(kind).clone();
        trace!(kind:%, attributes:?; "Instantiated preset");
        attributes
    }

    /// Replaces the template for `kind`.
    pub fn with_preset(mut self, kind: ElementKind, attributes: Attributes) -> Self {
        let slot = match kind {
            ElementKind::Fact => &mut self.fact,
            ElementKind::Dimension => &mut self.dimension,
            ElementKind::Edge => &mut self.edge,
            ElementKind::Descriptive => &mut self.descriptive,
            ElementKind::Optional => &mut self.optional,
            ElementKind::Hierarchy => &mut self.hierarchy,
        };
        *slot = attributes;
        self
    }
}
