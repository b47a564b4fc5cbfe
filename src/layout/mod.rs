//! Time apportionment: turning aggregate call costs into nested intervals.
//!
//! Callgrind profiles carry no timestamps, only how much cost each
//! function and each call accumulated. The layout engine treats cost as
//! elapsed time and lays children out back to back from their parent's
//! start, producing a tree that can be emitted as trace spans.

pub mod apportion;
pub mod interval;

// Re-export main types and functions
pub use apportion::{layout, LayoutConfig, RootDuration};
pub use interval::{children_of, Interval, IntervalAttributes, IntervalKind};
