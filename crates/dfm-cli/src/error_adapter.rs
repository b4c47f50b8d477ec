//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the standard error types of the
//! library and CLI and miette's rich diagnostic formatting. Script errors carry
//! the script source, so they are rendered with a labelled snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use dfm::DfmError;

use crate::error::{CliError, ConfigError};

/// Adapter rendering a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "dfm::io",
            CliError::Config(_) => "dfm::config",
            CliError::Script { .. } => "dfm::script",
            CliError::Step { source, .. } | CliError::Dfm(source) => dfm_code(source),
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Config(ConfigError::MissingFile(_)) => {
                "check the path passed with --config"
            }
            CliError::Script { .. } => {
                "each [[step]] needs a `kind` and the fields of that operation"
            }
            CliError::Step { source, .. } | CliError::Dfm(source) => dfm_help(source)?,
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Script { src, .. } | CliError::Step { src, .. } => {
                Some(src as &dyn miette::SourceCode)
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (span, message) = match self.0 {
            CliError::Script {
                span: Some(span),
                message,
                ..
            } => (span.clone(), message.clone()),
            CliError::Step { span, kind, .. } => (span.clone(), format!("{kind} step failed here")),
            _ => return None,
        };

        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(message), span),
        )))
    }
}

fn dfm_code(err: &DfmError) -> &'static str {
    match err {
        DfmError::Io(_) => "dfm::io",
        DfmError::Bootstrap(_) => "dfm::bootstrap",
        DfmError::InvalidSpec(_) => "dfm::invalid_spec",
        DfmError::DanglingReference { .. } => "dfm::dangling_reference",
        DfmError::Persistence { .. } => "dfm::persistence",
    }
}

fn dfm_help(err: &DfmError) -> Option<&'static str> {
    match err {
        DfmError::Bootstrap(_) => Some("check the [layout] section of the configuration"),
        DfmError::InvalidSpec(_) => {
            Some("labels must not be empty and lists must name at least one element")
        }
        DfmError::DanglingReference { .. } => {
            Some("create the referenced node in an earlier step before attaching to it")
        }
        DfmError::Persistence { .. } => {
            Some("make sure the output directory exists, or choose another path with --output")
        }
        DfmError::Io(_) => None,
    }
}

/// Convert a [`CliError`] into a reportable miette diagnostic.
pub fn to_reportable(err: &CliError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
