//! Error types for the DFM CLI.

use std::{io, ops::Range, path::PathBuf};

use thiserror::Error;

use dfm::DfmError;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
}

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The diagram script is not valid TOML or does not match the step format.
    #[error("Invalid diagram script: {message}")]
    Script {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    /// A script step was rejected by the schema.
    #[error("Step {index} ({kind}) failed: {source}")]
    Step {
        index: usize,
        kind: &'static str,
        span: Range<usize>,
        src: String,
        #[source]
        source: DfmError,
    },

    #[error(transparent)]
    Dfm(#[from] DfmError),
}

impl CliError {
    /// Returns the underlying schema error, if any.
    pub fn dfm_error(&self) -> Option<&DfmError> {
        match self {
            CliError::Step { source, .. } => Some(source),
            CliError::Dfm(err) => Some(err),
            _ => None,
        }
    }
}
