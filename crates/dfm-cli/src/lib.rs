//! CLI logic for the DFM diagram tool.
//!
//! This module reads a diagram script, applies its steps to a
//! [`Schema`](dfm::Schema), and writes the resulting DOT document.

pub mod error;
pub mod error_adapter;
pub mod script;

mod args;
mod config;

pub use args::Args;
pub use error::CliError;

use std::{fs, path::PathBuf};

use log::{debug, info};

use dfm::Schema;

use script::Script;

/// Run the DFM CLI application
///
/// This function applies the steps of the input script to a new schema and
/// writes the resulting DOT document to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Script syntax errors
/// - Failed schema operations
/// - Output write errors
pub fn run(args: &Args) -> Result<PathBuf, CliError> {
    info!(input_path = args.input; "Processing diagram script");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(output) = &args.output {
        app_config = app_config.with_output_path(output);
    }

    let source = fs::read_to_string(&args.input)?;
    let script = Script::parse(&source)?;

    let mut schema = Schema::new(&app_config)?;
    script.apply(&mut schema, &source)?;
    debug!(
        nodes_count = schema.graph().nodes_count(),
        edges_count = schema.graph().edges_count();
        "Script applied"
    );

    let output = schema.render_diagram()?;
    info!(output_file = output.display().to_string(); "DOT diagram exported successfully");

    Ok(output)
}
