//! Typed values carried by form controls.
//!
//! A [`Value`] is both the current content of a single field and, through the
//! `List`/`Map` variants, the structural composition of a whole control tree.
//! Form snapshots handed to submission handlers and the autosave channel are
//! plain `Value`s.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A form value: a leaf (text or flag) or a composite built from children.
///
/// `Map` keeps insertion order so a snapshot serializes in the same order the
/// schema declared its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free-form or choice-constrained text.
    Text(String),
    /// A boolean toggle (checkbox-style input).
    Flag(bool),
    /// Composition of an array control's items, in positional order.
    List(Vec<Value>),
    /// Composition of a group's children, in declaration order.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Build a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Build a flag value.
    pub fn flag(flag: bool) -> Self {
        Value::Flag(flag)
    }

    /// The text content, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The flag content, if this is a `Flag` value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Look up a child of a `Map` value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Look up an item of a `List` value by position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`, preserving map entry order.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(text) => serde_json::Value::String(text.clone()),
            Value::Flag(flag) => serde_json::Value::Bool(*flag),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Flag(flag)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Flag(flag) => serializer.serialize_bool(*flag),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
