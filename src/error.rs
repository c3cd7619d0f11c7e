//! Error types for mysql2pg

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting a script.
///
/// Statement-level variants are recoverable: the driver reports them as
/// diagnostics and emits the offending statement verbatim. Only the file
/// I/O variants abort a run.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to read SQL script: {path}")]
    ScriptReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write converted script to {path}")]
    ScriptWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No PostgreSQL mapping for MySQL type: {data_type}")]
    UnsupportedType { data_type: String },

    #[error("Table {table} has no primary key")]
    PrimaryKeyNotFound { table: String },

    #[error("Table {table} has a composite primary key, which is not supported")]
    CompositePrimaryKey { table: String },

    #[error("INSERT into {table} has no column list and no recorded table definition")]
    MissingColumnList { table: String },

    #[error("INSERT into {table} has {found} values for {expected} columns")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported statement shape: {message}")]
    UnsupportedStatement { message: String },
}
