//! Error types for DFM operations.
//!
//! This module provides the main error type [`DfmError`] which covers every
//! failure a schema can report while building or persisting a diagram.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for DFM operations.
///
/// Construction errors are reported before the graph is modified, so a
/// caller can stop at the first invalid step without leaving a partially
/// applied element behind. A [`DfmError::Persistence`] failure keeps the
/// in-memory graph; the caller may retry with another destination.
#[derive(Debug, Error)]
pub enum DfmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to initialize diagram graph: {0}")]
    Bootstrap(String),

    #[error("Invalid specification: {0}")]
    InvalidSpec(String),

    #[error("Node `{label}` referenced by {operation} does not exist")]
    DanglingReference {
        label: String,
        operation: &'static str,
    },

    #[error("Failed to write diagram to `{}`: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DfmError {
    /// Create a new `DanglingReference` error for the given label.
    pub fn dangling(label: impl Into<String>, operation: &'static str) -> Self {
        Self::DanglingReference {
            label: label.into(),
            operation,
        }
    }
}
