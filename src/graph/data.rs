use core::fmt::Debug;
use std::collections::BTreeMap;
use std::fmt::Display;

use serde::ser::Error;
use serde::{Deserialize, Serialize, Serializer};

/// Opaque payload of a [`crate::Node`] or [`crate::Edge`]
///
/// The engine never interprets the payload. It is stored, serialized and
/// handed to caller-supplied predicates, e.g. [`crate::Graph::mask_edges_where`].
pub type Data = BTreeMap<String, Value>;

/// A single scalar value of a [`Data`] payload
///
/// Serializing a non-finite `Float` fails, since JSON cannot represent it.
///
/// # Examples
///
/// ```
/// use hetnet::{Data, Value};
///
/// let mut data = Data::new();
/// data.insert("name".to_string(), "Multiple sclerosis".into());
/// data.insert("pvalue".to_string(), 0.003.into());
///
/// assert_eq!(data["name"].as_str(), Some("Multiple sclerosis"));
/// assert_eq!(data["pvalue"].as_f64(), Some(0.003));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    #[serde(serialize_with = "finite")]
    Float(f64),
    /// Text
    Str(String),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn finite<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() {
        serializer.serialize_f64(*n)
    } else {
        Err(S::Error::custom(format!("cannot serialize non-finite float {n}")))
    }
}

impl Value {
    /// Returns the text, if the value is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number as `f64`, if the value is a `Float` or an `Int`
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the integer, if the value is an `Int`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag, if the value is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_access() {
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from(3).as_i64(), Some(3));
        assert_eq!(Value::from(0.5).as_i64(), None);
        assert_eq!(Value::from("3").as_f64(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn untagged_json() {
        let data: Data = serde_json::from_str(
            r#"{"name": "IL17", "score": 0.25, "count": 4, "curated": false}"#,
        )
        .unwrap();
        assert_eq!(data["name"], Value::Str("IL17".to_string()));
        assert_eq!(data["score"], Value::Float(0.25));
        assert_eq!(data["count"], Value::Int(4));
        assert_eq!(data["curated"], Value::Bool(false));
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(serde_json::to_string(&Value::from(0.5)).unwrap(), "0.5");
        assert!(serde_json::to_string(&Value::from(f64::NAN)).is_err());
        assert!(serde_json::to_string(&Value::from(f64::INFINITY)).is_err());
    }
}
