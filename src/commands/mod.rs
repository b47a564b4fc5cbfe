//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod convert;
pub mod roots;

// Re-export main command functions
pub use convert::{execute_convert, select_root, validate_args, ConvertArgs};
pub use roots::{format_roots, list_roots};
