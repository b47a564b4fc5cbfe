//! Interval records produced by the layout engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What an interval stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// A function invocation (or the root function)
    Call,

    /// Time inside a function not covered by its children
    SelfTime,
}

/// Metadata attached to an interval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Edge call count, or the function's total `called` at the root
    pub invocation_count: u64,

    /// Only set on the root interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Only set on the root interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// One node of the laid-out interval tree
///
/// Intervals are stored in depth-first pre-order; `parent` indexes into
/// the same vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub depth: usize,
    pub parent: Option<usize>,
    pub kind: IntervalKind,
    pub attributes: IntervalAttributes,
}

impl Interval {
    pub fn duration(&self) -> Duration {
        (self.end - self.start).to_std().unwrap_or_default()
    }

    /// True when `other` lies within this interval's span
    pub fn contains(&self, other: &Interval) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Indices of the direct children of `index`
pub fn children_of(intervals: &[Interval], index: usize) -> Vec<usize> {
    intervals
        .iter()
        .enumerate()
        .filter(|(_, interval)| interval.parent == Some(index))
        .map(|(i, _)| i)
        .collect()
}
