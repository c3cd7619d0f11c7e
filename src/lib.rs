//! mysql2pg: converts MySQL dump scripts to PostgreSQL or GaussDB SQL.
//!
//! The converter works statement by statement: DDL is restructured (type
//! mapping, primary key promotion, comment and index extraction), DML is
//! rewritten at the literal level (boolean normalization, binary wrapping),
//! and anything it cannot understand passes through verbatim with a
//! diagnostic.

pub mod booleans;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod splitter;
pub mod tokens;

use std::path::PathBuf;

use anyhow::Result;

pub use booleans::BooleanColumnRegistry;
pub use convert::{convert_script, convert_script_with_context, ConversionContext, ConversionOutcome};
pub use dialect::{Dialect, DialectProfile};
pub use error::ConvertError;

/// Options for converting a script file
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path to the MySQL script
    pub input_path: PathBuf,
    /// Output path for the converted script
    pub output_path: Option<PathBuf>,
    /// Target dialect name (e.g. "postgresql", "gauss-mysql")
    pub dialect: String,
    /// Enable verbose output
    pub verbose: bool,
}

/// Convert a script file and write the result next to it (or to the
/// requested output path). Returns the path written.
pub fn convert_file(options: ConvertOptions) -> Result<PathBuf> {
    if options.verbose {
        println!("Converting script: {}", options.input_path.display());
    }

    let script = std::fs::read_to_string(&options.input_path).map_err(|source| {
        ConvertError::ScriptReadError {
            path: options.input_path.clone(),
            source,
        }
    })?;

    let profile = DialectProfile::from_name(&options.dialect);
    if options.verbose {
        println!("Target dialect: {}", profile.dialect.name());
    }

    let outcome = convert_script(&script, profile);

    if options.verbose {
        println!("Converted {} statements", outcome.statement_count);
        println!(
            "{} statements passed through unmodified",
            outcome.diagnostics.len()
        );
    }
    for diagnostic in &outcome.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let output_path = options.output_path.unwrap_or_else(|| {
        let parent = options
            .input_path
            .parent()
            .unwrap_or(std::path::Path::new("."));
        parent.join("target.sql")
    });

    std::fs::write(&output_path, &outcome.sql).map_err(|source| {
        ConvertError::ScriptWriteError {
            path: output_path.clone(),
            source,
        }
    })?;

    if options.verbose {
        println!("Wrote converted script: {}", output_path.display());
    }

    Ok(output_path)
}
