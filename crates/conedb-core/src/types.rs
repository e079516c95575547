//! Metadata primitives for emitted events
//!
//! Event metadata is a flat map of primitive values. Nesting is deliberately
//! not representable so the contract stays trivially serializable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single primitive metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// UTF-8 string
    Str(String),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Explicit null
    Null,
}

/// Flat metadata map attached to an event.
pub type Metadata = BTreeMap<String, MetaValue>;

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Str(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Str(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<u32> for MetaValue {
    fn from(v: u32) -> Self {
        MetaValue::Int(i64::from(v))
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl MetaValue {
    /// String contents, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer contents, if this value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean contents, if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Build a [`Metadata`] map from key/value pairs.
pub fn metadata<K, V, I>(pairs: I) -> Metadata
where
    K: Into<String>,
    V: Into<MetaValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_value_serializes_flat() {
        let meta = metadata([
            ("index", MetaValue::from("idx1")),
            ("attempts", MetaValue::from(3i64)),
            ("ready", MetaValue::from(true)),
        ]);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "index": "idx1", "attempts": 3, "ready": true })
        );
    }

    #[test]
    fn test_meta_value_roundtrip_null() {
        let v: MetaValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, MetaValue::Null);
    }

    #[test]
    fn test_integer_preferred_over_float() {
        let v: MetaValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, MetaValue::Int(42));
        let v: MetaValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(v, MetaValue::Float(4.5));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(MetaValue::from("a").as_str(), Some("a"));
        assert_eq!(MetaValue::from(7i64).as_int(), Some(7));
        assert_eq!(MetaValue::from(false).as_bool(), Some(false));
        assert_eq!(MetaValue::Null.as_str(), None);
    }
}
