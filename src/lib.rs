//! callgrind-spans
//!
//! Turns callgrind-format profiles (as written by instrumented build
//! tools such as Remake) into a call graph and a nested, time-ordered
//! interval tree ready to be emitted as trace spans.
//!
//! ## Getting Started
//!
//! ```bash
//! callgrind-spans convert callgrind.out.build -o trace.json --summary
//! ```
//!
//! Library users parse with [`parser::parse_file`] and lay out with
//! [`layout::layout`].

pub mod callgraph;
pub mod commands;
pub mod layout;
pub mod output;
pub mod parser;
pub mod utils;
