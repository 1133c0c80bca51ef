//! Language-neutral export record shared by every storage backend.
//!
//! The record is a tree of [`ExportValue`]s whose mappings keep insertion
//! order, so each backend walks the same statically-known shape.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Sequence(Vec<ExportValue>),
    Mapping(ExportMap),
}

/// Ordered string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportMap {
    entries: Vec<(String, ExportValue)>,
}

/// Top level of an export: `student`, `real_performance`, `desired_performance`.
pub type ExportRecord = ExportMap;

impl ExportValue {
    /// 純量的字串形式；序列與映射回傳 None
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            ExportValue::Null => Some(String::new()),
            ExportValue::Bool(b) => Some(b.to_string()),
            ExportValue::Integer(i) => Some(i.to_string()),
            ExportValue::Float(f) => Some(format_float(*f)),
            ExportValue::Text(s) => Some(s.clone()),
            ExportValue::Sequence(_) | ExportValue::Mapping(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExportValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ExportValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExportValue::Float(f) => Some(*f),
            ExportValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ExportValue]> {
        match self {
            ExportValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ExportMap> {
        match self {
            ExportValue::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl ExportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExportValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ExportValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<bool> for ExportValue {
    fn from(value: bool) -> Self {
        ExportValue::Bool(value)
    }
}

impl From<i64> for ExportValue {
    fn from(value: i64) -> Self {
        ExportValue::Integer(value)
    }
}

impl From<u32> for ExportValue {
    fn from(value: u32) -> Self {
        ExportValue::Integer(i64::from(value))
    }
}

impl From<u8> for ExportValue {
    fn from(value: u8) -> Self {
        ExportValue::Integer(i64::from(value))
    }
}

impl From<f64> for ExportValue {
    fn from(value: f64) -> Self {
        ExportValue::Float(value)
    }
}

impl From<&str> for ExportValue {
    fn from(value: &str) -> Self {
        ExportValue::Text(value.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(value: String) -> Self {
        ExportValue::Text(value)
    }
}

impl From<ExportMap> for ExportValue {
    fn from(value: ExportMap) -> Self {
        ExportValue::Mapping(value)
    }
}

impl<T: Into<ExportValue>> From<Vec<T>> for ExportValue {
    fn from(values: Vec<T>) -> Self {
        ExportValue::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl Serialize for ExportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportValue::Null => serializer.serialize_unit(),
            ExportValue::Bool(b) => serializer.serialize_bool(*b),
            ExportValue::Integer(i) => serializer.serialize_i64(*i),
            ExportValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            // 沒有原生表示的值改用字串形式
            ExportValue::Float(f) => serializer.serialize_str(&f.to_string()),
            ExportValue::Text(s) => serializer.serialize_str(s),
            ExportValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ExportValue::Mapping(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for ExportMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
