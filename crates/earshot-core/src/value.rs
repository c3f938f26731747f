//! Dynamic attribute values carried by tree nodes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A dynamic value read from a node attribute
///
/// Serialized untagged so attribute maps read naturally in both RON tree
/// documents and the JSON queries embedded in templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value (indices, levels, counts)
    Int(i64),
    /// Floating point value (slider positions, percentages)
    Float(f64),
    /// String value
    String(String),
    /// List of values
    List(Vec<Value>),
    /// Map of string keys to values
    Map(ValueMap),
    /// No value / null
    #[default]
    Null,
}

/// A map of string keys to dynamic values
///
/// Uses IndexMap to preserve insertion order (useful for deterministic serialization)
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Check if this value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    /// Render this value as announcement text
    ///
    /// Numbers stringify (integral floats without a fraction); null, lists
    /// and maps have no text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some((*f as i64).to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::List(_) | Value::Map(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert!(!Value::from(0).is_null());
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(2.0).as_int(), Some(2));
        assert_eq!(Value::Float(2.5).as_int(), None);
        assert_eq!(Value::from("7").as_int(), None);
    }

    #[test]
    fn test_value_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(1).is_truthy());
        assert!(!Value::String("".into()).is_truthy());
        assert!(Value::String("hello".into()).is_truthy());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(Value::Int(3).to_text().as_deref(), Some("3"));
        assert_eq!(Value::Float(3.0).to_text().as_deref(), Some("3"));
        assert_eq!(Value::Float(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from("Alpha").to_text().as_deref(), Some("Alpha"));
        assert_eq!(Value::from(0.25f64).to_text().as_deref(), Some("0.25"));
        assert_eq!(Value::from(4usize).to_text().as_deref(), Some("4"));
        assert_eq!(Value::Null.to_text(), None);
    }

    #[test]
    fn test_value_untagged_json() {
        let map: ValueMap = serde_json::from_str(r#"{"a": 1, "b": "x", "c": true}"#).unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("b"), Some(&Value::from("x")));
        assert_eq!(map.get("c"), Some(&Value::Bool(true)));
    }
}
