//! Output writers for laid-out traces.
//!
//! This module handles:
//! - The JSON trace document (schema, write, read)
//! - Text summaries for the terminal

pub mod json;
pub mod schema;
pub mod summary;

// Re-export main functions
pub use json::{read_trace, trace_to_string, write_trace};
pub use schema::{to_document, TraceDocument, TraceInterval};
pub use summary::generate_text_summary;
