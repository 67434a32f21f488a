//! The evidence mapping supplied by callers for a single validation call.
//!
//! A `Context` has no fixed schema. Each gate and metric reads only the keys
//! it needs, and the engine never mutates it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named evidence facts (booleans, numbers, strings, or string lists).
///
/// Lookups follow "truthy" semantics for flags: a missing key, `false`, `0`,
/// an empty string, an empty list and `null` all read as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    facts: Map<String, Value>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient for tests and CLI assembly.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a single fact.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.facts.insert(key.into(), value.into());
    }

    /// Raw access to a fact.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.facts.get(key)
    }

    /// True if the key is present at all, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    /// Read a fact as a flag using truthy semantics.
    pub fn flag(&self, key: &str) -> bool {
        match self.facts.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    /// Read a numeric fact. Non-numeric values yield `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.facts.get(key).and_then(Value::as_f64)
    }

    /// Read a numeric fact only when it is set and non-zero.
    ///
    /// Gates use this to decide whether optional financial evidence was
    /// supplied at all.
    pub fn present_number(&self, key: &str) -> Option<f64> {
        self.number(key).filter(|n| *n != 0.0)
    }

    /// Read a string fact.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.facts.get(key).and_then(Value::as_str)
    }

    /// Read a list of strings. Non-string entries are skipped.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.facts.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// Number of facts supplied.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// True if no facts were supplied.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl From<Map<String, Value>> for Context {
    fn from(facts: Map<String, Value>) -> Self {
        Self { facts }
    }
}
