//! Depth-first layout of a call graph into nested intervals.
//!
//! Each node occupies `[start, start + duration)` where the duration is the
//! cost of the edge that reached it. Children follow one another from the
//! node's start; whatever the children leave uncovered becomes a
//! `<name>_body` self-time interval. The node's end never moves, so when
//! children cost more than their parent they overflow it and the tree is
//! left as-is.

use super::interval::{Interval, IntervalAttributes, IntervalKind};
use crate::callgraph::{Call, Function, Profile};
use crate::utils::config::SELF_TIME_SUFFIX;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashSet;
use std::time::Duration;

/// Where the root interval's duration comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootDuration {
    /// The root function's self cost, or the profile total when that is zero
    #[default]
    SelfCost,

    /// Always the profile total from the `summary:`/`totals:` line
    TotalCost,
}

/// Layout configuration
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub root_duration: RootDuration,

    /// Emit self-time intervals for functions that call nothing
    pub leaf_self_time: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_duration: RootDuration::SelfCost,
            leaf_self_time: true,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_duration(mut self, root_duration: RootDuration) -> Self {
        self.root_duration = root_duration;
        self
    }

    pub fn with_leaf_self_time(mut self, leaf_self_time: bool) -> Self {
        self.leaf_self_time = leaf_self_time;
        self
    }
}

/// Lay out the call tree below `root`, starting at `start`
///
/// Returns intervals in depth-first pre-order, the root first. Calls to
/// functions missing from the profile are skipped, though their cost still
/// advances the sibling cursor. A call back into a function already on the
/// current path is emitted but not expanded.
pub fn layout(
    profile: &Profile,
    start: DateTime<Utc>,
    root: &Function,
    config: &LayoutConfig,
) -> Vec<Interval> {
    let mut walker = Walker {
        profile,
        config,
        intervals: Vec::new(),
        path: HashSet::new(),
    };

    walker.visit(start, root, None, None, 0);

    debug!(
        "Laid out {} interval(s) below '{}'",
        walker.intervals.len(),
        root.name
    );
    walker.intervals
}

struct Walker<'a> {
    profile: &'a Profile,
    config: &'a LayoutConfig,
    intervals: Vec<Interval>,
    path: HashSet<&'a str>,
}

impl<'a> Walker<'a> {
    fn visit(
        &mut self,
        start: DateTime<Utc>,
        function: &'a Function,
        call: Option<&'a Call>,
        parent: Option<usize>,
        depth: usize,
    ) {
        let duration = match call {
            Some(call) => call.cost,
            None => self.root_duration(function),
        };

        let mut attributes = IntervalAttributes {
            module: function.module.clone(),
            invocation_count: call.map_or(function.called, |c| c.calls),
            creator: None,
            command: None,
        };
        if call.is_none() {
            attributes.creator = self.profile.creator.clone();
            attributes.command = self.profile.command.clone();
        }

        let index = self.intervals.len();
        self.intervals.push(Interval {
            label: function.name.clone(),
            start,
            end: advance(start, duration),
            depth,
            parent,
            kind: IntervalKind::Call,
            attributes,
        });

        if !self.path.insert(function.id.as_str()) {
            warn!(
                "Recursive call into '{}' at depth {}, not expanding",
                function.name, depth
            );
            return;
        }

        let mut cursor = start;
        let mut children_total = Duration::ZERO;

        for child in function.calls() {
            match self.profile.function(&child.callee_id) {
                Some(callee) => self.visit(cursor, callee, Some(child), Some(index), depth + 1),
                None => warn!(
                    "Skipping call from '{}' to unknown function '{}'",
                    function.name, child.callee_id
                ),
            }

            cursor = advance(cursor, child.cost);
            children_total = children_total.saturating_add(child.cost);
        }

        if let Some(call) = call {
            let emits = function.call_count() > 0 || self.config.leaf_self_time;
            if emits && children_total < call.cost {
                self.intervals.push(Interval {
                    label: format!("{}{}", function.name, SELF_TIME_SUFFIX),
                    start: cursor,
                    end: advance(cursor, call.cost - children_total),
                    depth: depth + 1,
                    parent: Some(index),
                    kind: IntervalKind::SelfTime,
                    attributes: IntervalAttributes {
                        module: function.module.clone(),
                        invocation_count: call.calls,
                        creator: None,
                        command: None,
                    },
                });
            }
        }

        self.path.remove(function.id.as_str());
    }

    fn root_duration(&self, root: &Function) -> Duration {
        match self.config.root_duration {
            RootDuration::SelfCost if !root.cost.is_zero() => root.cost,
            RootDuration::SelfCost | RootDuration::TotalCost => self.profile.total_cost,
        }
    }
}

/// `at + by`, saturating at the largest representable timestamp
fn advance(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
