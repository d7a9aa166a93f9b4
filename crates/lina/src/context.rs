/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value types.
//!
//! A [`TemplateValue`] is the data a template is rendered against. It covers
//! the three kinds of containers a path can walk into (keyed maps, indexed
//! lists and attribute-bearing objects) plus scalars and null.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A host object that exposes named attributes to templates.
///
/// Implement this for types that should be reachable through `{{obj.field}}`
/// without converting them into a [`TemplateValue::Map`] up front.
pub trait TemplateObject: fmt::Debug + Send + Sync {
    /// Look up an attribute by name, returning `None` if it does not exist.
    fn get_attribute(&self, name: &str) -> Option<TemplateValue>;
}

/// A value that can be used in template rendering.
#[derive(Debug, Clone, Default)]
pub enum TemplateValue {
    /// A null/missing value. Treated as absent everywhere.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// An integer value.
    Integer(i64),

    /// A floating point value.
    Float(f64),

    /// A string value.
    String(String),

    /// A list of values.
    List(Vec<TemplateValue>),

    /// A map of string keys to values.
    Map(HashMap<String, TemplateValue>),

    /// An object exposing attributes.
    Object(Arc<dyn TemplateObject>),
}

impl PartialEq for TemplateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TemplateValue::Null, TemplateValue::Null) => true,
            (TemplateValue::Bool(a), TemplateValue::Bool(b)) => a == b,
            (TemplateValue::Integer(a), TemplateValue::Integer(b)) => a == b,
            (TemplateValue::Float(a), TemplateValue::Float(b)) => a == b,
            (TemplateValue::String(a), TemplateValue::String(b)) => a == b,
            (TemplateValue::List(a), TemplateValue::List(b)) => a == b,
            (TemplateValue::Map(a), TemplateValue::Map(b)) => a == b,
            (TemplateValue::Object(a), TemplateValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl TemplateValue {
    /// Create an empty map value.
    pub fn map() -> Self {
        TemplateValue::Map(HashMap::new())
    }

    /// Wrap a host object.
    pub fn object(object: impl TemplateObject + 'static) -> Self {
        TemplateValue::Object(Arc::new(object))
    }

    /// Convert any serializable host value.
    ///
    /// Values that serde_json cannot represent (e.g. maps with non-string
    /// keys) become [`TemplateValue::Null`].
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Self {
        serde_json::to_value(value)
            .map(TemplateValue::from)
            .unwrap_or(TemplateValue::Null)
    }

    /// Insert a key into a map value. Has no effect on other variants.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TemplateValue>) {
        if let TemplateValue::Map(m) = self {
            m.insert(key.into(), value.into());
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }

    /// Look up a named field: a key of a map or an attribute of an object.
    pub fn get_field(&self, name: &str) -> Option<Cow<'_, TemplateValue>> {
        match self {
            TemplateValue::Map(m) => m.get(name).map(Cow::Borrowed),
            TemplateValue::Object(o) => o.get_attribute(name).map(Cow::Owned),
            _ => None,
        }
    }

    /// Bounds-checked index into a list.
    pub fn get_index(&self, index: usize) -> Option<&TemplateValue> {
        match self {
            TemplateValue::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Render this value as text for output.
    ///
    /// - String: returned as-is
    /// - Integer: decimal
    /// - Float: shortest form, integral values keep a trailing `.0`
    /// - Bool: "True" or "False"
    /// - List: concatenation of rendered elements
    /// - Map, Object, Null: ""
    pub fn render(&self) -> String {
        match self {
            TemplateValue::String(s) => s.clone(),
            TemplateValue::Integer(i) => i.to_string(),
            TemplateValue::Float(f) => render_float(*f),
            TemplateValue::Bool(true) => "True".to_string(),
            TemplateValue::Bool(false) => "False".to_string(),
            TemplateValue::List(items) => items.iter().map(|v| v.render()).collect(),
            TemplateValue::Map(_) | TemplateValue::Object(_) | TemplateValue::Null => {
                String::new()
            }
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TemplateValue::Null,
            serde_json::Value::Bool(b) => TemplateValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => TemplateValue::Integer(i),
                None => n
                    .as_f64()
                    .map(TemplateValue::Float)
                    .unwrap_or(TemplateValue::Null),
            },
            serde_json::Value::String(s) => TemplateValue::String(s),
            serde_json::Value::Array(items) => {
                TemplateValue::List(items.into_iter().map(TemplateValue::from).collect())
            }
            serde_json::Value::Object(map) => TemplateValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, TemplateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::String(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::String(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TemplateValue {
                fn from(value: $ty) -> Self {
                    TemplateValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Float(value)
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(TemplateValue::Null)
    }
}

impl<T: Into<TemplateValue>> From<Vec<T>> for TemplateValue {
    fn from(items: Vec<T>) -> Self {
        TemplateValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> From<HashMap<K, V>> for TemplateValue {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> From<BTreeMap<K, V>> for TemplateValue {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TemplateValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
