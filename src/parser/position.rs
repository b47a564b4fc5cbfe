//! Position specifiers and subposition decoding.
//!
//! A specifier line such as `cfn=(12) parse_args` names the current
//! object, file or function. Each specifier writes its own slot in the
//! position table but shares a back-reference table with its base
//! category, so `cfn=(12)` can resolve an id first seen as `fn=(12) ...`.

use std::collections::HashMap;

/// Back-reference category for compressed names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Object,
    File,
    Function,
}

/// Slot in the position table a specifier writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Ob,
    Fl,
    Fn,
    Cob,
    Cfl,
    Cfn,
    Jfi,
}

/// A recognized position specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifier {
    pub category: Category,
    pub slot: Slot,
}

impl Specifier {
    /// Map a specifier name (`fn`, `cfi`, `jfi`, ...) to its table and slot
    pub fn from_name(name: &str) -> Option<Self> {
        let (category, slot) = match name {
            "ob" => (Category::Object, Slot::Ob),
            "fl" | "fi" | "fe" => (Category::File, Slot::Fl),
            "fn" => (Category::Function, Slot::Fn),
            "cob" => (Category::Object, Slot::Cob),
            "cfl" | "cfi" | "cfe" => (Category::File, Slot::Cfl),
            "cfn" => (Category::Function, Slot::Cfn),
            "jfi" => (Category::File, Slot::Jfi),
            _ => return None,
        };

        Some(Self { category, slot })
    }
}

/// Current names per slot plus the id tables for back-references
#[derive(Debug, Default)]
pub struct PositionTable {
    current: HashMap<Slot, String>,
    ids: HashMap<(Category, String), String>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a specifier with an optional `(id)` and optional name
    ///
    /// An id with a name records the pair; an id alone looks the name up
    /// (unknown ids resolve to an empty name). Returns the name stored.
    pub fn assign(&mut self, spec: Specifier, id: Option<&str>, name: Option<&str>) -> &str {
        let name = name.unwrap_or("");
        let resolved = match id {
            Some(id) if !name.is_empty() => {
                self.ids
                    .insert((spec.category, id.to_string()), name.to_string());
                name.to_string()
            }
            Some(id) => self
                .ids
                .get(&(spec.category, id.to_string()))
                .cloned()
                .unwrap_or_default(),
            None => name.to_string(),
        };

        let entry = self.current.entry(spec.slot).or_default();
        *entry = resolved;
        entry.as_str()
    }

    /// Current name in `slot`, empty when never assigned
    pub fn get(&self, slot: Slot) -> &str {
        self.current.get(&slot).map(String::as_str).unwrap_or("")
    }

    /// Current name in `slot`, or in `fallback` when `slot` was never assigned
    pub fn get_or(&self, slot: Slot, fallback: Slot) -> &str {
        match self.current.get(&slot) {
            Some(name) => name.as_str(),
            None => self.get(fallback),
        }
    }

    pub fn clear(&mut self, slot: Slot) {
        self.current.remove(&slot);
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.current.contains_key(&slot)
    }

    pub fn set(&mut self, slot: Slot, value: String) {
        self.current.insert(slot, value);
    }
}

/// True when `token` is `0x<hex>`, `<decimal>`, `+<decimal>`, `-<decimal>` or `*`
pub fn is_subposition(token: &str) -> bool {
    if token == "*" {
        return true;
    }
    if let Some(hex) = token.strip_prefix("0x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    let digits = token
        .strip_prefix('+')
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    is_decimal(digits)
}

pub fn is_decimal(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Resolve one subposition token against the previous absolute value
///
/// Unparsable numbers decode to zero.
pub fn decode_subposition(token: &str, previous: i64) -> i64 {
    if token == "*" {
        return previous;
    }
    if let Some(delta) = token.strip_prefix('+') {
        return previous.wrapping_add(parse_number(delta));
    }
    if let Some(delta) = token.strip_prefix('-') {
        return previous.wrapping_sub(parse_number(delta));
    }

    parse_number(token)
}

fn parse_number(token: &str) -> i64 {
    match token.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16).unwrap_or(0),
        None => token.parse::<i64>().unwrap_or(0),
    }
}
