//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a callgrind profile
///
/// Everything else the format can throw at us (bad numbers, unknown ids,
/// dangling calls) is absorbed by the parser and never surfaces here.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("too many values on cost line (declared columns exceeded): {line}")]
    MalformedSchema { line: String },

    #[error("expected to be at end of input, but had line left: {line}")]
    TrailingInput { line: String },

    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
