use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The result object of a run.
///
/// Macro code cannot touch it directly: it is handed to every host function
/// as the trailing argument, and host functions are the only writers. `run`
/// returns it once the program finishes.
///
/// # Examples
///
/// ```
/// use jsonmacro::{Context, Value};
///
/// let mut context = Context::new();
/// context.insert("total", 12);
/// assert_eq!(context.get("total"), Some(&Value::from(12)));
/// assert_eq!(context.to_json(), r#"{"total":12}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.entries
    }

    /// Compact JSON of every entry.
    ///
    /// Non-finite numbers (for example a host storing `1 / 0`) have no JSON
    /// form and are written as `null`.
    pub fn to_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Context { entries }
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Self {
        Value::Object(context.entries)
    }
}
