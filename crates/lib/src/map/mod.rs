//! The container family's main map type and its operation surface.
//!
//! [`PropMap`] is an insertion-ordered mapping from normalized string keys to
//! [`Value`]s. It carries the concrete [`Kind`] it was constructed as, an
//! optional default specification consulted on absent-key reads, and the full
//! operation surface: core reads and writes, derived kind-preserving
//! constructions, the merge engine ([`merge`]), and property-style dispatch
//! ([`dispatch`]).
//!
//! # Usage
//!
//! ```
//! use propmap::PropMap;
//! use serde_json::json;
//!
//! let mut map = PropMap::from_json(json!({"user": {"name": "Alice"}}));
//! map.insert("age", 30);
//!
//! assert_eq!(map.invoke("age"), 30);
//! assert_eq!(map.invoke("admin?"), false);
//! assert_eq!(map.dig(&["user", "name"]).unwrap(), "Alice");
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::key::{AsKey, normalize};
use crate::kind::{Kind, warn_on_collision};

// Submodules
pub mod convert;
pub mod dispatch;
pub mod list;
pub mod merge;
pub mod value;

// Convenience re-exports for core map types
pub use convert::Incoming;
pub use dispatch::{Intent, Request};
pub use list::List;
pub use merge::MergeSource;
pub use value::Value;

/// Fallback behavior for reads of absent keys.
///
/// Either a fixed value returned for any missing key, or a factory invoked
/// with the container and the missing key. Factories are `Rc`-shared so maps
/// stay cheaply clonable; the container model is single-threaded throughout.
#[derive(Clone)]
pub enum DefaultSpec {
    /// A fixed value returned for any absent key.
    Value(Box<Value>),
    /// A factory invoked with (container, missing key) on each absent-key read.
    Factory(Rc<dyn Fn(&PropMap, &str) -> Value>),
}

impl fmt::Debug for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DefaultSpec::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// The container family's map type.
///
/// # Core Operations
///
/// - **Data access**: [`get`](Self::get), [`read`](Self::read) (default-applying),
///   [`fetch`](Self::fetch), [`dig`](Self::dig)
/// - **Data modification**: [`insert`](Self::insert), [`remove`](Self::remove),
///   [`clear`](Self::clear)
/// - **Derived constructions** (all preserve the receiver's kind):
///   [`duplicate`](Self::duplicate), [`compact`](Self::compact),
///   [`invert`](Self::invert), [`slice`](Self::slice), filters and transforms
/// - **Merging**: see [`merge`]
/// - **Property dispatch**: see [`dispatch`]
///
/// Equality compares entry content only; kind tags and default specifications
/// do not participate.
#[derive(Debug, Clone)]
pub struct PropMap {
    /// Entries in insertion order, keyed by normalized strings
    entries: IndexMap<String, Value>,
    /// Concrete flavor of this map; derived operations construct with it
    kind: Kind,
    /// Optional fallback for absent-key reads
    default: Option<DefaultSpec>,
}

impl PropMap {
    /// Creates a new empty map of the base kind
    pub fn new() -> Self {
        Self::of_kind(Kind::BASE)
    }

    /// Creates a new empty map of the given kind
    pub fn of_kind(kind: Kind) -> Self {
        Self {
            entries: IndexMap::new(),
            kind,
            default: None,
        }
    }

    /// Creates a base-kind map with a fixed default value for absent keys
    pub fn with_default(default: impl Into<Value>) -> Self {
        let mut map = Self::new();
        map.default = Some(DefaultSpec::Value(Box::new(default.into())));
        map
    }

    /// Creates a base-kind map whose absent-key reads invoke `factory`
    /// with the container and the missing key.
    pub fn with_default_factory(factory: impl Fn(&PropMap, &str) -> Value + 'static) -> Self {
        let mut map = Self::new();
        map.default = Some(DefaultSpec::Factory(Rc::new(factory)));
        map
    }

    /// Builds a map by deeply normalizing foreign JSON.
    ///
    /// Non-object input yields an empty map; producers are expected to hand
    /// the core a parsed object.
    pub fn from_json(json: serde_json::Value) -> Self {
        Self::from_json_of_kind(Kind::BASE, json)
    }

    /// Parses a JSON document and deeply normalizes it into a base-kind map.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serialize`] when the input is not valid JSON.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::from_json(parsed))
    }

    /// Builds a map of the given kind by deeply normalizing foreign JSON.
    pub fn from_json_of_kind(kind: Kind, json: serde_json::Value) -> Self {
        match convert::convert_for(kind, Incoming::Foreign(json), false) {
            Value::Map(map) => map,
            _ => Self::of_kind(kind),
        }
    }

    /// Returns the concrete kind of this map
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Replaces the default specification, returning the map for chaining
    pub fn set_default(&mut self, default: Option<DefaultSpec>) -> &mut Self {
        self.default = default;
        self
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: impl AsKey) -> bool {
        self.entries.contains_key(key.as_key().as_ref())
    }

    /// Gets a value by key (immutable reference). Does not consult the
    /// default specification; see [`read`](Self::read) for that.
    pub fn get(&self, key: impl AsKey) -> Option<&Value> {
        self.entries.get(key.as_key().as_ref())
    }

    /// Gets a mutable reference to a value by key
    pub fn get_mut(&mut self, key: impl AsKey) -> Option<&mut Value> {
        self.entries.get_mut(key.as_key().as_ref())
    }

    /// Reads a value by key, falling back to the default specification.
    ///
    /// Absent keys are never an error: with no default configured the read
    /// yields [`Value::Null`].
    pub fn read(&self, key: impl AsKey) -> Value {
        let key = normalize(key);
        if let Some(value) = self.entries.get(&key) {
            return value.clone();
        }
        match &self.default {
            Some(DefaultSpec::Value(v)) => (**v).clone(),
            Some(DefaultSpec::Factory(factory)) => factory(self, &key),
            None => Value::Null,
        }
    }

    /// Gets a value by key, ignoring the default specification.
    pub fn fetch(&self, key: impl AsKey) -> Option<&Value> {
        self.get(key)
    }

    /// Gets a value by key, converting `fallback` when the key is absent.
    /// The default specification is not consulted.
    pub fn fetch_or(&self, key: impl AsKey, fallback: impl Into<Incoming>) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => convert::convert_for(self.kind, fallback.into(), false),
        }
    }

    /// Stores a value under the normalized key, returning the previous value.
    ///
    /// The value passes through conversion with duplication enabled; a write
    /// that newly shadows a built-in surface name emits an advisory
    /// diagnostic unless suppressed for this map's kind.
    pub fn insert(&mut self, key: impl AsKey, value: impl Into<Incoming>) -> Option<Value> {
        let key = normalize(key);
        let converted = convert::convert_for(self.kind, value.into(), true);
        self.store(key, converted)
    }

    /// Removes a value by key, preserving the order of remaining entries
    pub fn remove(&mut self, key: impl AsKey) -> Option<Value> {
        self.entries.shift_remove(key.as_key().as_ref())
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over all key-value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Returns a mutable iterator over all key-value pairs
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Returns an iterator over all keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns an iterator over all values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Returns an independent copy of this map, preserving kind and default
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Returns a new map of the same kind with null-valued entries dropped
    pub fn compact(&self) -> Self {
        let mut out = self.spawn();
        for (key, value) in &self.entries {
            if !value.is_null() {
                out.entries.insert(key.clone(), value.clone());
            }
        }
        out
    }

    /// Returns a new map of the same kind with keys and values swapped,
    /// stringifying both: values become keys via their display form, keys
    /// become text values.
    pub fn invert(&self) -> Self {
        let mut out = self.spawn();
        for (key, value) in &self.entries {
            out.entries
                .insert(value.to_string(), Value::Text(key.clone()));
        }
        out
    }

    /// Returns a new map of the same kind keeping entries the predicate accepts
    pub fn filter_select(&self, mut predicate: impl FnMut(&str, &Value) -> bool) -> Self {
        let mut out = self.spawn();
        for (key, value) in &self.entries {
            if predicate(key, value) {
                out.entries.insert(key.clone(), value.clone());
            }
        }
        out
    }

    /// Returns a new map of the same kind dropping entries the predicate accepts
    pub fn filter_reject(&self, mut predicate: impl FnMut(&str, &Value) -> bool) -> Self {
        self.filter_select(|key, value| !predicate(key, value))
    }

    /// Returns a new map of the same kind containing only the given keys
    /// (absent keys are skipped)
    pub fn slice<K: AsKey>(&self, keys: &[K]) -> Self {
        let mut out = self.spawn();
        for key in keys {
            let key = normalize(key);
            if let Some(value) = self.entries.get(&key) {
                out.entries.insert(key, value.clone());
            }
        }
        out
    }

    /// Reads each key in order, applying the default specification for
    /// absent keys
    pub fn values_at<K: AsKey>(&self, keys: &[K]) -> Vec<Value> {
        keys.iter().map(|key| self.read(key)).collect()
    }

    /// Returns a new map of the same kind with every value replaced by the
    /// converted result of `f`
    pub fn transform_values<R: Into<Incoming>>(&self, mut f: impl FnMut(&Value) -> R) -> Self {
        let mut out = self.spawn();
        for (key, value) in &self.entries {
            let converted = convert::convert_for(self.kind, f(value).into(), true);
            out.entries.insert(key.clone(), converted);
        }
        out
    }

    /// Returns a new map of the same kind with every key replaced by the
    /// normalized result of `f`
    pub fn transform_keys(&self, mut f: impl FnMut(&str) -> String) -> Self {
        let mut out = self.spawn();
        for (key, value) in &self.entries {
            out.entries.insert(normalize(f(key)), value.clone());
        }
        out
    }

    /// Navigates a path of keys through nested maps and lists.
    ///
    /// List segments parse as indices; navigation through a scalar yields
    /// `None`.
    pub fn dig<K: AsKey>(&self, path: &[K]) -> Option<&Value> {
        let mut segments = path.iter();
        let first = segments.next()?;
        let mut current = self.entries.get(normalize(first).as_str())?;
        for segment in segments {
            let segment = normalize(segment);
            current = match current {
                Value::Map(map) => map.entries.get(&segment)?,
                Value::List(list) => {
                    let index: usize = segment.parse().ok()?;
                    list.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Converts to a `serde_json::Value` for export to external systems.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            object.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(object)
    }

    /// New empty map of the receiver's kind; derived operations build on this.
    fn spawn(&self) -> Self {
        Self::of_kind(self.kind)
    }

    /// Stores an already-converted value under an already-normalized key.
    ///
    /// The collision guard runs only when the key is not yet present: once a
    /// reserved name holds ordinary data, overwriting it is not a new shadow
    /// and stays silent.
    pub(crate) fn store(&mut self, key: String, value: Value) -> Option<Value> {
        if !self.entries.contains_key(&key) {
            warn_on_collision(self.kind, &key);
        }
        self.entries.insert(key, value)
    }
}

impl Default for PropMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PropMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for PropMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.entries {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl<K: AsKey, V: Into<Incoming>> FromIterator<(K, V)> for PropMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = PropMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for PropMap {
    fn from(entries: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_json(serde_json::Value::Object(entries))
    }
}

impl IntoIterator for PropMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for PropMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}

impl<'de> Deserialize<'de> for PropMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from(entries))
    }
}
