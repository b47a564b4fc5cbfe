//! Callgrind profile parsing.
//!
//! This module handles:
//! - Line lookahead with comment skipping
//! - The header/body grammar of the format
//! - Position decoding (repeat and delta compression)
//! - Scaling event values into durations

pub mod callgrind;
pub mod cost;
pub mod line_cursor;
pub mod position;

// Re-export main types
pub use callgrind::{parse_file, parse_profile, parse_str, CallgrindParser, ParserConfig};
pub use cost::CostUnit;
pub use line_cursor::LineCursor;
