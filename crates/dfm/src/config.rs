//! Configuration types for DFM diagram rendering.
//!
//! This module provides configuration structures that control where diagrams
//! are written, which global layout directives they carry, and how each DFM
//! element kind is styled. All types implement [`serde::Deserialize`] for
//! loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining output, layout and presets.
//! - [`OutputConfig`] - Destination of the rendered DOT document.
//! - [`LayoutConfig`] - Global layout directives for the layout engine.
//! - [`Presets`] - Attribute templates per element kind.
//!
//! # Example
//!
//! ```
//! # use dfm::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.output().path().to_str(), Some("dot.dot"));
//! assert_eq!(config.layout().engine(), "twopi");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use dfm_core::preset::Presets;

/// Top-level configuration combining output, layout and preset settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Attribute presets section.
    #[serde(default)]
    presets: Presets,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `output` - Destination of the rendered diagram.
    /// * `layout` - Global layout directives.
    /// * `presets` - Attribute templates per element kind.
    pub fn new(output: OutputConfig, layout: LayoutConfig, presets: Presets) -> Self {
        Self {
            output,
            layout,
            presets,
        }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the attribute presets.
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    /// Returns a copy of this configuration writing to `path`.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.path = path.into();
        self
    }
}

/// Destination of the rendered DOT document.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the DOT file, overwritten on every render.
    #[serde(default = "default_output_path")]
    path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl OutputConfig {
    /// Creates an output configuration writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dot.dot")
}

/// Global layout directives written into the bootstrap document.
///
/// Values are inserted into the bootstrap DOT text as-is; a value that is not
/// a valid DOT identifier makes schema creation fail with a bootstrap error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Graphviz layout engine name.
    engine: String,

    /// Node overlap removal mode.
    overlap: String,

    /// Scaling factor applied when removing overlaps.
    overlap_scaling: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: "twopi".to_string(),
            overlap: "prism".to_string(),
            overlap_scaling: 4.5,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `engine` - Layout engine name, such as `twopi` or `circo`.
    /// * `overlap` - Overlap removal mode, such as `prism` or `scale`.
    /// * `overlap_scaling` - Scaling factor for overlap removal.
    pub fn new(engine: impl Into<String>, overlap: impl Into<String>, overlap_scaling: f64) -> Self {
        Self {
            engine: engine.into(),
            overlap: overlap.into(),
            overlap_scaling,
        }
    }

    /// Returns the layout engine name.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Returns the overlap removal mode.
    pub fn overlap(&self) -> &str {
        &self.overlap
    }

    /// Returns the overlap scaling factor.
    pub fn overlap_scaling(&self) -> f64 {
        self.overlap_scaling
    }

    /// Builds the bootstrap DOT document fixing the global rendering mode.
    pub fn bootstrap_document(&self) -> String {
        format!(
            "digraph G {{\n\tlayout={};\n\toverlap={};\n\toverlap_scaling={};\n}}",
            self.engine, self.overlap, self.overlap_scaling
        )
    }
}
