//! Scalar values and ordered key/value maps for query parameters and headers.
//!
//! # Design
//! Parameters and headers accept a small closed set of scalar variants
//! instead of arbitrary values, so the string conversion used on the wire is
//! explicit: `Display` on `Value` is exactly what lands in a query item.
//! `KeyValues` keeps insertion order; re-inserting a key overwrites its value
//! in place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar accepted as a parameter or header value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// The text of a `String` value. Other variants have no header form.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

macro_rules! integer_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Integer(i64::from(i))
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! clamped_integer_value {
    ($($t:ty),*) => {
        $(
            /// Values outside the `i64` range clamp to `i64::MIN`/`i64::MAX`.
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    let clamped = i64::try_from(i)
                        .unwrap_or(if i > 0 as $t { i64::MAX } else { i64::MIN });
                    Value::Integer(clamped)
                }
            }
        )*
    };
}

clamped_integer_value!(u64, usize, isize, i128, u128);

/// Ordered string-keyed map of `Value`s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyValues {
    entries: Vec<(String, Value)>,
}

/// Query parameters appended to the request URL.
pub type Parameters = KeyValues;

/// Header fields set on the outgoing request.
pub type Headers = KeyValues;

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for KeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KeyValues::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
