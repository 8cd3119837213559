//! Request context passed to predicates and handlers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mixed set of arguments accompanying one availability check or dispatch.
///
/// The context lives for a single request. Predicates and handlers read it;
/// nothing in the dispatch path writes to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionContext {
    args: Map<String, Value>,
}

impl ActionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, replacing any previous value under `key`.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Inserts an argument, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.args.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Builds a context from `key=value` pairs (see [`parse_arg`]).
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = Self::new();
        for pair in pairs {
            let (key, value) = parse_arg(pair.as_ref())?;
            ctx.insert(key, value);
        }
        Ok(ctx)
    }
}

/// Parses a `key=value` argument.
///
/// The value is read as JSON when it parses (`true`, `42`, `"x"`, `[1,2]`),
/// otherwise it is kept as a plain string.
pub fn parse_arg(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid argument '{raw}': expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid argument '{raw}': empty key"));
    }
    let value = serde_json::from_str::<Value>(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
