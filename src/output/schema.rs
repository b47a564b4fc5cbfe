//! Output JSON schema definitions for laid-out traces.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::callgraph::Profile;
use crate::layout::{Interval, IntervalAttributes, IntervalKind};
use crate::utils::config::SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level trace document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Profile file the trace was built from
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Name of the function the layout started from
    pub root: String,

    /// Aggregate cost declared by the profile, in nanoseconds
    pub total_cost_ns: u64,

    /// Number of functions in the parsed call graph
    pub function_count: usize,

    /// Timestamp when the document was generated
    pub generated_at: String,

    /// Intervals in depth-first pre-order
    pub intervals: Vec<TraceInterval>,
}

/// An interval as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceInterval {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_ns: u64,
    pub depth: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,

    pub kind: IntervalKind,
    pub attributes: IntervalAttributes,
}

impl From<&Interval> for TraceInterval {
    fn from(interval: &Interval) -> Self {
        Self {
            label: interval.label.clone(),
            start: interval.start,
            end: interval.end,
            duration_ns: saturating_nanos(interval.duration()),
            depth: interval.depth,
            parent: interval.parent,
            kind: interval.kind,
            attributes: interval.attributes.clone(),
        }
    }
}

/// Assemble the document for a laid-out profile
pub fn to_document(
    source: &str,
    profile: &Profile,
    root: &str,
    intervals: &[Interval],
) -> TraceDocument {
    TraceDocument {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        creator: profile.creator.clone(),
        command: profile.command.clone(),
        root: root.to_string(),
        total_cost_ns: saturating_nanos(profile.total_cost),
        function_count: profile.len(),
        generated_at: Utc::now().to_rfc3339(),
        intervals: intervals.iter().map(TraceInterval::from).collect(),
    }
}

fn saturating_nanos(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
