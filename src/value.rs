//! The dynamic value tree validated by a [`Validator`](crate::Validator).
//!
//! Input data, rule parameters and resolved targets all share this one type.
//! It mirrors JSON (with an explicit integer/float split) and adds two opaque
//! leaves: date-times and arbitrary Rust objects, so rules such as
//! `dateBefore` and `instanceOf` can work with already-typed values.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Ordered string-keyed mapping used for [`Value::Map`].
pub type Map = IndexMap<String, Value>;

/// A node of the data tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    DateTime(DateTime<FixedOffset>),
    Object(Instance),
}

impl Value {
    /// Wraps an arbitrary Rust value as an opaque [`Value::Object`].
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Instance::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for lists and maps.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Looks up a direct child: a map entry by key, or a list element by
    /// decimal index.
    pub fn child(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            Value::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Iterates `(key, value)` pairs of a container in natural order. List
    /// keys are their indices. Scalars yield nothing.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (String, &Value)> + '_> {
        match self {
            Value::Map(map) => Box::new(map.iter().map(|(k, v)| (k.clone(), v))),
            Value::List(items) => Box::new(items.iter().enumerate().map(|(i, v)| (i.to_string(), v))),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Element values of a container, in order. Scalars yield nothing.
    pub fn elements(&self) -> Vec<&Value> {
        match self {
            Value::Map(map) => map.values().collect(),
            Value::List(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Name of the value's type as shown in messages and matched by
    /// `instanceOf`.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::DateTime(_) => "DateTime",
            Value::Object(instance) => instance.short_name(),
        }
    }
}

// ─── Opaque objects ─────────────────────────────────────────────────────────

/// Shared handle to an arbitrary Rust value stored in a [`Value`] tree.
///
/// Equality is identity: two instances are equal only when they share the
/// same allocation.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    type_id: TypeId,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Fully qualified type name, e.g. `my_app::forms::Upload`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path or generic arguments, e.g. `Upload`.
    pub fn short_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn same_type(&self, other: &Instance) -> bool {
        self.type_id == other.type_id
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance<{}>", self.type_name)
    }
}

// ─── Conversions ────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(i64::from(n))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map(Value::Int).unwrap_or(Value::Float(n as f64))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::from(n as u64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
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

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.fixed_offset())
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::DateTime(date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset())
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ─── Serde ──────────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Object(instance) => serializer.serialize_str(instance.short_name()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
