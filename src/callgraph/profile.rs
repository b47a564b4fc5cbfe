//! The profile: every function of a run plus header metadata.

use super::function::Function;
use std::collections::HashMap;
use std::time::Duration;

/// How functions are told apart while building the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionIdentity {
    /// Name only. Same-named functions from different objects or files
    /// collapse into one node, as the source tooling does.
    #[default]
    Name,

    /// Object, file and name together
    Qualified,
}

impl FunctionIdentity {
    /// Build the id of a function under this policy
    pub fn key(&self, module: &str, file: &str, name: &str) -> String {
        match self {
            FunctionIdentity::Name => name.to_string(),
            FunctionIdentity::Qualified => format!("{}|{}|{}", module, file, name),
        }
    }
}

/// A parsed callgrind profile
///
/// Functions live in an arena; `index` maps ids to arena slots so that
/// lookups and inserts are a single step.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    functions: Vec<Function>,
    index: HashMap<String, usize>,

    /// Tool that produced the profile (`creator:` line)
    pub creator: Option<String>,

    /// Command line that was profiled (`cmd:` line)
    pub command: Option<String>,

    /// Aggregate cost declared by the `summary:`/`totals:` line
    pub total_cost: Duration,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the function with `id`, creating it if absent
    ///
    /// `module` is only used on creation and is reduced to its last path
    /// segment. Returns the arena slot of the function.
    pub fn function_or_insert(&mut self, id: &str, name: &str, module: &str) -> usize {
        if let Some(&slot) = self.index.get(id) {
            return slot;
        }

        let function = Function::new(id, name).with_module(module_base_name(module));
        let slot = self.functions.len();
        self.functions.push(function);
        self.index.insert(id.to_string(), slot);
        slot
    }

    pub fn function(&self, id: &str) -> Option<&Function> {
        self.index.get(id).map(|&slot| &self.functions[slot])
    }

    pub fn function_mut(&mut self, id: &str) -> Option<&mut Function> {
        match self.index.get(id) {
            Some(&slot) => self.functions.get_mut(slot),
            None => None,
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> &mut Function {
        &mut self.functions[slot]
    }

    /// All functions, in creation order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions never targeted by a call, sorted by id
    pub fn roots(&self) -> Vec<&Function> {
        let mut roots: Vec<&Function> = self.functions.iter().filter(|f| f.is_root()).collect();
        roots.sort_by(|a, b| a.id.cmp(&b.id));
        roots
    }

    /// The root with the largest inclusive cost, ties broken by id
    pub fn heaviest_root(&self) -> Option<&Function> {
        self.roots()
            .into_iter()
            .max_by(|a, b| {
                a.inclusive_cost()
                    .cmp(&b.inclusive_cost())
                    .then_with(|| b.id.cmp(&a.id))
            })
    }
}

/// Last path segment of an object path, `None` when there is no object
fn module_base_name(module: &str) -> Option<String> {
    let trimmed = module.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .rsplit('/')
        .next()
        .map(|segment| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_or_insert_is_idempotent() {
        let mut profile = Profile::new();
        let first = profile.function_or_insert("main", "main", "/usr/bin/make");
        let second = profile.function_or_insert("main", "main", "/other/bin");

        assert_eq!(first, second);
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.function("main").unwrap().module.as_deref(), Some("make"));
    }

    #[test]
    fn test_module_base_name() {
        assert_eq!(module_base_name("/usr/lib/libc.so"), Some("libc.so".to_string()));
        assert_eq!(module_base_name("make"), Some("make".to_string()));
        assert_eq!(module_base_name(""), None);
    }

    #[test]
    fn test_roots_filters_called() {
        let mut profile = Profile::new();
        profile.function_or_insert("a", "a", "");
        let b = profile.function_or_insert("b", "b", "");
        profile.function_or_insert("c", "c", "");
        profile.slot_mut(b).called = 1;

        let roots: Vec<&str> = profile.roots().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(roots, vec!["a", "c"]);
    }

    #[test]
    fn test_heaviest_root() {
        let mut profile = Profile::new();
        let a = profile.function_or_insert("a", "a", "");
        let b = profile.function_or_insert("b", "b", "");
        profile.slot_mut(a).cost = Duration::from_micros(10);
        profile
            .slot_mut(b)
            .record_call("x", 1, Duration::from_micros(50));

        assert_eq!(profile.heaviest_root().unwrap().id, "b");
    }

    #[test]
    fn test_qualified_identity_keeps_objects_apart() {
        let identity = FunctionIdentity::Qualified;
        assert_ne!(
            identity.key("liba.so", "a.c", "init"),
            identity.key("libb.so", "b.c", "init")
        );
        assert_eq!(FunctionIdentity::Name.key("liba.so", "a.c", "init"), "init");
    }
}
