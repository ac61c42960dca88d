//! Core value type that flows through every schema.
//!
//! The engine validates untyped input, so values are modelled as a closed
//! enum mirroring a JSON-like data model with an extra `Undefined` variant
//! for "absent". Object keys keep insertion order so that output objects and
//! aggregated issues follow declaration order.
//!
//! Arrays and objects are stored behind an `Arc`, so cloning a value copies
//! at most one string and never a whole tree. Steps that need an owned
//! container take it with [`Value::into_array`] / [`Value::into_object`],
//! which copy only the top level when the container is shared.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Ordered map used for object values.
pub type Object = IndexMap<String, Value>;

/// A dynamically typed value.
///
/// `Undefined` marks an absent value: reading a missing object key yields
/// `Undefined`, and optional object fields treat it as "not present".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null
    Null,
    /// Absent value (serializes as null)
    #[default]
    Undefined,
    /// Boolean
    Boolean(bool),
    /// 64-bit floating point number
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    Array(Arc<Vec<Value>>),
    /// Ordered key-value map
    Object(Arc<Object>),
}

impl Value {
    /// Name of the variant, used in issue payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Whether this value is absent.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(items) = self {
            Some(items.as_ref())
        } else {
            None
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&Object> {
        if let Value::Object(map) = self {
            Some(map.as_ref())
        } else {
            None
        }
    }

    /// Look up an object property, returning `Undefined` when missing or
    /// when this value is not an object.
    pub fn get(&self, key: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.as_object()
            .and_then(|map| map.get(key))
            .unwrap_or(&UNDEFINED)
    }

    /// Convert to a `serde_json::Value`. `Undefined` becomes `null` and
    /// non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Build an object value from key-value pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::from(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect::<Object>(),
        )
    }

    /// Build an array value from items.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Take the items of an array value. Other values are returned as `Err`.
    pub fn into_array(self) -> Result<Vec<Value>, Value> {
        match self {
            Value::Array(items) => {
                Ok(Arc::try_unwrap(items).unwrap_or_else(|shared| (*shared).clone()))
            }
            other => Err(other),
        }
    }

    /// Take the entries of an object value. Other values are returned as `Err`.
    pub fn into_object(self) -> Result<Object, Value> {
        match self {
            Value::Object(map) => {
                Ok(Arc::try_unwrap(map).unwrap_or_else(|shared| (*shared).clone()))
            }
            other => Err(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(Arc::new(map))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items),
            serde_json::Value::Object(map) => Value::object(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from("a").kind(), "string");
        assert_eq!(Value::from(1).kind(), "number");
        assert_eq!(Value::Undefined.kind(), "undefined");
        assert_eq!(Value::array(Vec::<Value>::new()).kind(), "array");
    }

    #[test]
    fn test_get_missing_key_is_undefined() {
        let value = Value::object([("name", "John")]);
        assert_eq!(value.get("name"), &Value::from("John"));
        assert!(value.get("age").is_undefined());
        assert!(Value::from(3).get("x").is_undefined());
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::from(json!({"b": 1, "a": [true, null]}));
        assert_eq!(value.get("b"), &Value::Number(1.0));
        assert_eq!(value.to_json(), json!({"b": 1.0, "a": [true, null]}));
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let value = Value::object([("b", 1), ("a", 2)]);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_clone_shares_containers() {
        let value = Value::object([("tags", Value::array(["a", "b"]))]);
        let copy = value.clone();
        match (&value, &copy) {
            (Value::Object(a), Value::Object(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => unreachable!(),
        }

        // Taking a shared container copies it and leaves the original intact.
        let mut owned = copy.into_object().unwrap();
        owned.insert("extra".to_string(), Value::Null);
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(Value::from(3).into_array(), Err(Value::from(3)));
    }

    #[test]
    fn test_undefined_serializes_as_null() {
        let json = serde_json::to_string(&Value::Undefined).unwrap();
        assert_eq!(json, "null");
    }
}
