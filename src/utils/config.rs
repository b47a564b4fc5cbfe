//! Configuration and constants shared by the parser, layout and CLI.

/// Current trace document schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Position columns assumed until a `positions:` line says otherwise
pub const DEFAULT_POSITIONS: &[&str] = &["line"];

/// Appended to a function name to label its synthesized self-time interval
pub const SELF_TIME_SUFFIX: &str = "_body";

/// Rows printed by the text summary unless asked otherwise
pub const DEFAULT_SUMMARY_LINES: usize = 10;

/// Header keys that identify a part without affecting the profile
pub const PART_DETAIL_KEYS: &[&str] = &["cmd", "pid", "thread", "part"];

/// Header keys carrying the aggregate cost of the whole run
pub const SUMMARY_KEYS: &[&str] = &["summary", "totals"];
