//! Diagram scripts.
//!
//! A script is a TOML document holding an ordered `[[step]]` array. Each step
//! names a schema operation in its `kind` field; list fields are
//! whitespace-separated strings, split here before reaching the schema.
//!
//! ```toml
//! [[step]]
//! kind = "fact"
//! name = "Sales"
//! attributes = "quantity revenue"
//!
//! [[step]]
//! kind = "sequence_dimension"
//! labels = "store city region"
//! attach = "Sales"
//! ```

use log::debug;
use serde::Deserialize;
use toml::Spanned;

use dfm::{DfmError, Schema};

use crate::error::CliError;

/// A single schema operation read from a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Fact {
        name: String,
        #[serde(default)]
        attributes: String,
    },
    Dimension {
        label: String,
        attach: String,
    },
    SequenceDimension {
        labels: String,
        attach: String,
    },
    Convergence {
        label: String,
        attach: String,
    },
    Hierarchy {
        levels: String,
        from: String,
        to: String,
    },
    Optional {
        label: String,
        attach: String,
    },
    Descriptive {
        label: String,
        to: String,
    },
    SequenceDescriptive {
        labels: String,
        to: String,
    },
}

impl Step {
    /// Returns the script name of the step kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Fact { .. } => "fact",
            Step::Dimension { .. } => "dimension",
            Step::SequenceDimension { .. } => "sequence_dimension",
            Step::Convergence { .. } => "convergence",
            Step::Hierarchy { .. } => "hierarchy",
            Step::Optional { .. } => "optional",
            Step::Descriptive { .. } => "descriptive",
            Step::SequenceDescriptive { .. } => "sequence_descriptive",
        }
    }

    /// Applies the step to a schema.
    ///
    /// # Errors
    ///
    /// Returns the schema error for the operation.
    pub fn apply(&self, schema: &mut Schema) -> Result<(), DfmError> {
        match self {
            Step::Fact { name, attributes } => {
                schema.create_fact(name, &split(attributes))?;
            }
            Step::Dimension { label, attach } => schema.add_dimension(label, attach)?,
            Step::SequenceDimension { labels, attach } => {
                schema.add_sequence_dimension(&split(labels), attach)?
            }
            Step::Convergence { label, attach } => schema.add_convergence(label, attach)?,
            Step::Hierarchy { levels, from, to } => schema.add_hierarchy(&split(levels), from, to)?,
            Step::Optional { label, attach } => schema.add_optional(label, attach)?,
            Step::Descriptive { label, to } => schema.add_descriptive(label, to)?,
            Step::SequenceDescriptive { labels, to } => {
                schema.add_sequence_descriptive(&split(labels), to)?
            }
        }
        Ok(())
    }
}

/// Ordered list of steps read from a TOML document.
#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    steps: Vec<Spanned<Step>>,
}

impl Script {
    /// Parses a script from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Script`] with the offending source span if the
    /// text is not valid TOML or a step is malformed.
    pub fn parse(src: &str) -> Result<Self, CliError> {
        let script: Script = toml::from_str(src).map_err(|err| CliError::Script {
            message: err.message().to_string(),
            span: err.span(),
            src: src.to_string(),
        })?;

        debug!(steps_count = script.steps.len(); "Script parsed");
        Ok(script)
    }

    /// Iterates over the steps in script order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(Spanned::get_ref)
    }

    /// Applies every step to the schema, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Step`] naming the failed step and its span in
    /// `src`.
    pub fn apply(&self, schema: &mut Schema, src: &str) -> Result<(), CliError> {
        for (index, step) in self.steps.iter().enumerate() {
            let kind = step.get_ref().kind();
            debug!(index = index + 1, kind; "Applying step");

            step.get_ref()
                .apply(schema)
                .map_err(|source| CliError::Step {
                    index: index + 1,
                    kind,
                    span: step.span(),
                    src: src.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

fn split(list: &str) -> Vec<&str> {
    list.split_whitespace().collect()
}
