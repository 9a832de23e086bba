//! Ordered, path-addressed configuration namespaces.
//!
//! A [`Namespace`] is an insertion-ordered mapping from plain keys to
//! [`Value`]s, where a value may itself be a nested namespace, a
//! [`RefinableObject`], a deferred [`Lazy`] callable, or a JSON scalar.
//! Entries are addressed by double-underscore paths (`fruits__banana__taste`)
//! and merge left-to-right with deep-merge semantics (see [`merge`]).

pub mod convert;
pub mod merge;
pub mod path;

use std::fmt;
use std::mem;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::refine::RefinableObject;
use path::{segments, SEPARATOR};

/// A single-level path→value view of a nested namespace.
pub type Flattened = IndexMap<String, Value>;

/// A value stored in a namespace.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A nested namespace (merges recursively).
    Namespace(Namespace),
    /// A nested refinable object (refined in place, never blindly merged).
    Object(RefinableObject),
    /// A deferred callable, kept opaque until the consumer evaluates it.
    Lazy(Lazy),
    /// A scalar leaf.
    Scalar(Json),
}

impl Value {
    /// The scalar null value, used when a declared member was never set.
    pub fn none() -> Value {
        Value::Scalar(Json::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Json::Null))
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Value::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&RefinableObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Json> {
        match self {
            Value::Scalar(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Json::as_str)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Namespace(ns) => ns.fmt(f),
            Value::Object(obj) => obj.fmt(f),
            Value::Lazy(lazy) => lazy.fmt(f),
            Value::Scalar(json) => write!(f, "{json}"),
        }
    }
}

impl From<Namespace> for Value {
    fn from(ns: Namespace) -> Value {
        Value::Namespace(ns)
    }
}

impl From<RefinableObject> for Value {
    fn from(obj: RefinableObject) -> Value {
        Value::Object(obj)
    }
}

impl From<Lazy> for Value {
    fn from(lazy: Lazy) -> Value {
        Value::Lazy(lazy)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Value {
        Value::Scalar(json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Scalar(Json::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Scalar(Json::String(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Scalar(Json::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Scalar(Json::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Scalar(Json::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Scalar(Json::from(b))
    }
}

/// A deferred value: a callable stored in a namespace and evaluated later
/// by the consumer. Compared by pointer identity.
#[derive(Clone)]
pub struct Lazy(Arc<dyn Fn() -> Value + Send + Sync>);

impl Lazy {
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Lazy {
        Lazy(Arc::new(f))
    }

    /// Evaluate the deferred value.
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl PartialEq for Lazy {
    fn eq(&self, other: &Lazy) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<lazy>")
    }
}

/// An insertion-ordered, nested key-value container with path addressing.
///
/// Equality ignores entry order (two namespaces with the same entries are
/// equal regardless of insertion history) but includes the shortcut flag.
#[derive(Clone, PartialEq, Default)]
pub struct Namespace {
    entries: IndexMap<String, Value>,
    shortcut: bool,
}

impl Namespace {
    pub fn new() -> Namespace {
        Namespace::default()
    }

    /// A shortcut namespace: flagged non-mergeable, it replaces outright in
    /// a deep merge instead of merging key by key, and flattens as a leaf.
    pub fn shortcut() -> Namespace {
        Namespace {
            entries: IndexMap::new(),
            shortcut: true,
        }
    }

    pub fn is_shortcut(&self) -> bool {
        self.shortcut
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Insert under a plain key. If both the existing and the incoming value
    /// are mergeable namespaces they deep-merge; anything else replaces.
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.get_mut(&key) {
            Some(slot) => {
                let previous = mem::replace(slot, Value::none());
                *slot = merge::merge_value(previous, value);
            }
            None => {
                self.entries.insert(key, value);
            }
        }
    }

    /// Deep-set a path, creating intermediate namespaces as needed. A
    /// non-namespace intermediate is displaced by a fresh namespace. The
    /// leaf inserts with [`insert`](Namespace::insert) merge semantics.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) {
        let parts = segments(path);
        let Some((last, init)) = parts.split_last() else {
            return;
        };
        let mut node = self;
        for part in init {
            let slot = node
                .entries
                .entry((*part).to_string())
                .or_insert_with(|| Value::Namespace(Namespace::new()));
            if !matches!(slot, Value::Namespace(_)) {
                *slot = Value::Namespace(Namespace::new());
            }
            node = match slot {
                Value::Namespace(ns) => ns,
                _ => unreachable!(),
            };
        }
        node.insert(*last, value);
    }

    /// Builder form of [`set_path`](Namespace::set_path).
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Namespace {
        self.set_path(path, value);
        self
    }

    /// Deep-read a path. `None` if any segment is absent or an intermediate
    /// segment is not a namespace. The empty path addresses nothing.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let parts = segments(path);
        let (last, init) = parts.split_last()?;
        let mut node = self;
        for part in init {
            node = match node.entries.get(*part)? {
                Value::Namespace(ns) => ns,
                _ => return None,
            };
        }
        node.entries.get(*last)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(Value::as_str)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get_path(path).and_then(|v| v.as_scalar()).and_then(Json::as_i64)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path).and_then(|v| v.as_scalar()).and_then(Json::as_bool)
    }

    /// Decompose into a single-level path→value view. Non-empty mergeable
    /// namespaces recurse; empty and shortcut namespaces stay as leaves so
    /// the view round-trips through [`set_path`](Namespace::set_path).
    pub fn flatten(&self) -> Flattened {
        let mut out = Flattened::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Flattened) {
        for (key, value) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{SEPARATOR}{key}")
            };
            match value {
                Value::Namespace(ns) if !ns.is_shortcut() && !ns.is_empty() => {
                    ns.flatten_into(&path, out);
                }
                other => {
                    out.insert(path, other.clone());
                }
            }
        }
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Namespace {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.shortcut { "Shortcut" } else { "Namespace" };
        write!(f, "{name}(")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        write!(f, ")")
    }
}
