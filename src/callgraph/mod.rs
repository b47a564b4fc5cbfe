//! Call graph model reconstructed from a callgrind profile.
//!
//! The parser is the only writer: it finds-or-creates functions and
//! accumulates call edges while walking the cost lines. Once parsing is
//! done the graph is read-only and handed to the layout engine.

pub mod function;
pub mod profile;

// Re-export main types
pub use function::{Call, Function};
pub use profile::{FunctionIdentity, Profile};
