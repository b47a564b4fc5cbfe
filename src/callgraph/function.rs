//! Functions and the call edges they own.

use std::collections::HashMap;
use std::time::Duration;

/// An aggregated call from one function to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Id of the called function
    pub callee_id: String,

    /// Number of invocations folded into this edge
    pub calls: u64,

    /// Total cost of those invocations
    pub cost: Duration,
}

/// A function seen in the profile, either as a cost context or as a callee
#[derive(Debug, Clone)]
pub struct Function {
    pub id: String,
    pub name: String,

    /// Last path segment of the originating object, if the profile named one
    pub module: Option<String>,

    /// Last source line observed for this function
    pub line_number: i64,

    /// Invocations summed over every edge targeting this function
    pub called: u64,

    /// Self cost: direct cost lines recorded while this function was active
    pub cost: Duration,

    calls: Vec<Call>,
    call_index: HashMap<String, usize>,
}

impl Function {
    /// Create a function with no cost, no callers and no callees
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            module: None,
            line_number: 0,
            called: 0,
            cost: Duration::ZERO,
            calls: Vec::new(),
            call_index: HashMap::new(),
        }
    }

    pub fn with_module(mut self, module: Option<String>) -> Self {
        self.module = module;
        self
    }

    /// Fold an association into the edge towards `callee_id`
    ///
    /// Repeated records for the same callee accumulate into one edge;
    /// they never replace it.
    pub fn record_call(&mut self, callee_id: &str, calls: u64, cost: Duration) {
        match self.call_index.get(callee_id) {
            Some(&index) => {
                let call = &mut self.calls[index];
                call.calls = call.calls.saturating_add(calls);
                call.cost = call.cost.saturating_add(cost);
            }
            None => {
                self.call_index
                    .insert(callee_id.to_string(), self.calls.len());
                self.calls.push(Call {
                    callee_id: callee_id.to_string(),
                    calls,
                    cost,
                });
            }
        }
    }

    /// Outgoing calls in the order they first appeared in the profile
    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter()
    }

    pub fn call(&self, callee_id: &str) -> Option<&Call> {
        self.call_index.get(callee_id).map(|&index| &self.calls[index])
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// True when no edge in the profile targets this function
    pub fn is_root(&self) -> bool {
        self.called == 0
    }

    /// Self cost plus the cost of every outgoing edge
    pub fn inclusive_cost(&self) -> Duration {
        self.calls
            .iter()
            .fold(self.cost, |total, call| total.saturating_add(call.cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_call_accumulates() {
        let mut main = Function::new("main", "main");

        main.record_call("work", 2, Duration::from_micros(30));
        main.record_call("work", 3, Duration::from_micros(12));

        assert_eq!(main.call_count(), 1);
        let call = main.call("work").unwrap();
        assert_eq!(call.calls, 5);
        assert_eq!(call.cost, Duration::from_micros(42));
    }

    #[test]
    fn test_calls_keep_first_appearance_order() {
        let mut main = Function::new("main", "main");
        main.record_call("b", 1, Duration::ZERO);
        main.record_call("a", 1, Duration::ZERO);
        main.record_call("b", 1, Duration::ZERO);

        let order: Vec<&str> = main.calls().map(|c| c.callee_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_inclusive_cost() {
        let mut main = Function::new("main", "main");
        main.cost = Duration::from_micros(5);
        main.record_call("a", 1, Duration::from_micros(10));
        main.record_call("b", 1, Duration::from_micros(20));

        assert_eq!(main.inclusive_cost(), Duration::from_micros(35));
        assert!(main.is_root());
    }
}
