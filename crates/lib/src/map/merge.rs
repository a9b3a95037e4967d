//! Deep and shallow merge operations.
//!
//! The deep variants recurse only where the existing value is already a
//! family map *and* the incoming value is a foreign object; every other
//! collision is resolved by converting the incoming value and replacing
//! wholesale. An optional resolver sees `(key, old, converted_incoming)` for
//! keys that already existed and its result is converted again before
//! storage. All stores run through the ordinary write path, so key
//! normalization and the collision guard apply.

use std::collections::HashSet;

use crate::key::normalize;

use super::PropMap;
use super::convert::{Incoming, convert_for};
use super::value::Value;

/// A map handed to the merge engine: either a family map or a foreign JSON
/// object.
#[derive(Debug, Clone)]
pub enum MergeSource {
    /// A family map; its values enter the merge as family values.
    Map(PropMap),
    /// A foreign object; its values enter the merge as foreign values, which
    /// is what enables deep recursion into existing nested maps.
    Foreign(serde_json::Map<String, serde_json::Value>),
}

impl MergeSource {
    fn into_pairs(self) -> Vec<(String, Incoming)> {
        match self {
            MergeSource::Map(map) => map
                .entries
                .into_iter()
                .map(|(key, value)| (key, Incoming::Value(value)))
                .collect(),
            MergeSource::Foreign(object) => object
                .into_iter()
                .map(|(key, value)| (normalize(key), Incoming::Foreign(value)))
                .collect(),
        }
    }
}

impl From<PropMap> for MergeSource {
    fn from(map: PropMap) -> Self {
        MergeSource::Map(map)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for MergeSource {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self {
        MergeSource::Foreign(object)
    }
}

impl From<serde_json::Value> for MergeSource {
    /// Non-object JSON contributes nothing to a merge.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(object) => MergeSource::Foreign(object),
            _ => MergeSource::Foreign(serde_json::Map::new()),
        }
    }
}

impl PropMap {
    /// Deep-merges each source into this map in order, mutating in place.
    /// Returns the receiver for chaining.
    pub fn deep_update<S>(&mut self, sources: impl IntoIterator<Item = S>) -> &mut Self
    where
        S: Into<MergeSource>,
    {
        for source in sources {
            self.apply_deep(source.into(), None);
        }
        self
    }

    /// Deep-merges each source in order, consulting `resolver` with
    /// `(key, old, converted_incoming)` wherever a non-recursive store hits a
    /// pre-existing key. The resolver's result is converted again before
    /// storage.
    pub fn deep_update_with<S, R>(
        &mut self,
        sources: impl IntoIterator<Item = S>,
        mut resolver: R,
    ) -> &mut Self
    where
        S: Into<MergeSource>,
        R: FnMut(&str, &Value, Value) -> Value,
    {
        for source in sources {
            self.apply_deep(
                source.into(),
                Some(&mut resolver as &mut dyn FnMut(&str, &Value, Value) -> Value),
            );
        }
        self
    }

    /// Non-mutating deep merge: duplicates the receiver, then applies
    /// [`deep_update`](Self::deep_update) to the duplicate.
    pub fn deep_merge<S>(&self, sources: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<MergeSource>,
    {
        let mut out = self.duplicate();
        out.deep_update(sources);
        out
    }

    /// Non-mutating twin of [`deep_update_with`](Self::deep_update_with).
    pub fn deep_merge_with<S, R>(&self, sources: impl IntoIterator<Item = S>, resolver: R) -> Self
    where
        S: Into<MergeSource>,
        R: FnMut(&str, &Value, Value) -> Value,
    {
        let mut out = self.duplicate();
        out.deep_update_with(sources, resolver);
        out
    }

    /// Shallow merge in place: every pair of `other` is converted and stored
    /// at its normalized key; no recursion, no resolver. Keys absent from
    /// `other` are untouched.
    pub fn update(&mut self, other: impl Into<MergeSource>) -> &mut Self {
        for (key, incoming) in other.into().into_pairs() {
            let value = convert_for(self.kind, incoming, true);
            self.store(key, value);
        }
        self
    }

    /// Non-mutating shallow merge.
    pub fn merge(&self, other: impl Into<MergeSource>) -> Self {
        let mut out = self.duplicate();
        out.update(other);
        out
    }

    /// Makes this map's key set exactly `other`'s: keys absent from `other`
    /// are deleted, then every pair of `other` is stored through the ordinary
    /// write path with full normalization.
    pub fn replace(&mut self, other: impl Into<MergeSource>) -> &mut Self {
        let pairs = other.into().into_pairs();
        let incoming_keys: HashSet<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|key| !incoming_keys.contains(key.as_str()))
            .cloned()
            .collect();
        for key in stale {
            self.entries.shift_remove(&key);
        }
        for (key, incoming) in pairs {
            let value = convert_for(self.kind, incoming, true);
            self.store(key, value);
        }
        self
    }

    // The resolver's trait-object lifetime is decoupled from its `&mut`
    // borrow so the reference can be reborrowed into the recursive call and
    // again for the resolver invocation below.
    fn apply_deep<'r>(
        &mut self,
        source: MergeSource,
        mut resolver: Option<&mut (dyn FnMut(&str, &Value, Value) -> Value + 'r)>,
    ) {
        for (key, incoming) in source.into_pairs() {
            let incoming = match incoming {
                // Recurse only into an existing family map hit by a foreign
                // object; the nested map's identity and untouched keys survive.
                Incoming::Foreign(serde_json::Value::Object(object))
                    if matches!(self.entries.get(&key), Some(Value::Map(_))) =>
                {
                    if let Some(Value::Map(existing)) = self.entries.get_mut(&key) {
                        existing.apply_deep(MergeSource::Foreign(object), resolver.as_deref_mut());
                    }
                    continue;
                }
                other => other,
            };
            let previous = self.entries.get(&key).cloned();
            let mut value = convert_for(self.kind, incoming, true);
            if let (Some(old), Some(resolve)) = (previous, resolver.as_deref_mut()) {
                value = convert_for(self.kind, Incoming::Value(resolve(&key, &old, value)), true);
            }
            self.store(key, value);
        }
    }
}
