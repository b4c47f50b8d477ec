//! DFM - A builder for Dimensional Fact Model diagrams.
//!
//! Translates star-schema concepts (facts, dimensions, hierarchies,
//! convergence points, optional and descriptive attributes) into a directed
//! graph and serializes it as a Graphviz DOT document for a radial layout.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dfm::{Schema, config::AppConfig};
//!
//! let config = AppConfig::default().with_output_path("sales.dot");
//! let mut schema = Schema::new(&config)?;
//!
//! schema.create_fact("Sales", &["quantity", "revenue"])?;
//! schema.add_dimension("store", "Sales")?;
//! schema.add_optional("promotion", "Sales")?;
//!
//! schema.render_diagram()?;
//! # Ok::<(), dfm::DfmError>(())
//! ```

pub mod config;
pub mod export;
pub mod structure;

mod error;
mod schema;

pub use dfm_core::{attributes, fact, preset};

pub use error::DfmError;
pub use schema::Schema;
