//! Property-style dispatch over requested names.
//!
//! A requested name carries its intent in a trailing marker character:
//! `=` assigns, `?` tests truthiness, `!` force-creates, `_` creates
//! ephemerally; no marker means a plain read. Rather than a catch-all
//! unknown-member hook, the convention is an explicit parser ([`Request`])
//! plus dispatch entry points on [`PropMap`]. A literal key equal to the
//! requested name, marker included, shadows the convention entirely.

use crate::key::normalize;

use super::PropMap;
use super::convert::Incoming;
use super::value::Value;

/// What a trailing marker (or its absence) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Plain read; absent keys fall back to the default specification.
    Read,
    /// Store the supplied value under the base name (`=`).
    Assign,
    /// Truthiness test of the current value at the base name (`?`).
    Query,
    /// Read, storing a new empty map first when the base name is absent (`!`).
    ForceCreate,
    /// Read, returning a new empty map without storing when absent (`_`).
    Ephemeral,
}

/// A requested property name split into base name and intent.
///
/// # Examples
///
/// ```
/// use propmap::map::{Intent, Request};
///
/// let req = Request::parse("admin?");
/// assert_eq!(req.base, "admin");
/// assert_eq!(req.intent, Intent::Query);
///
/// let req = Request::parse("name");
/// assert_eq!(req.base, "name");
/// assert_eq!(req.intent, Intent::Read);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The name with any trailing marker stripped
    pub base: String,
    /// The behavior the marker asks for
    pub intent: Intent,
}

impl Request {
    /// Splits a requested name into `(base, intent)`.
    pub fn parse(name: &str) -> Self {
        let (base, intent) = if let Some(base) = name.strip_suffix('=') {
            (base, Intent::Assign)
        } else if let Some(base) = name.strip_suffix('?') {
            (base, Intent::Query)
        } else if let Some(base) = name.strip_suffix('!') {
            (base, Intent::ForceCreate)
        } else if let Some(base) = name.strip_suffix('_') {
            (base, Intent::Ephemeral)
        } else {
            (name, Intent::Read)
        };
        Self {
            base: base.to_string(),
            intent,
        }
    }

    /// Returns the marker character for this request's intent, if any.
    pub fn marker(&self) -> Option<char> {
        match self.intent {
            Intent::Read => None,
            Intent::Assign => Some('='),
            Intent::Query => Some('?'),
            Intent::ForceCreate => Some('!'),
            Intent::Ephemeral => Some('_'),
        }
    }
}

impl PropMap {
    /// Dispatches a zero-argument property request.
    ///
    /// A literal key equal to `name` (marker included) shadows the marker
    /// convention and is read directly. Otherwise the trailing marker picks
    /// the behavior: `?` yields a boolean, `!` force-creates, `_` creates
    /// ephemerally, and no marker is a plain default-applying read. An
    /// `=`-marked name without a value to assign degrades to a plain read of
    /// the full name.
    pub fn invoke(&mut self, name: &str) -> Value {
        if self.contains_key(name) {
            return self.read(name);
        }
        let request = Request::parse(name);
        match request.intent {
            Intent::Read | Intent::Assign => self.read(name),
            Intent::Query => Value::Bool(self.truthy(&request.base)),
            Intent::ForceCreate => self.force(&request.base).clone(),
            Intent::Ephemeral => self.ephemeral(&request.base),
        }
    }

    /// Dispatches a property request carrying a value, returning the stored
    /// value.
    ///
    /// With an existing literal key (marker included) or any non-`=` name,
    /// the write targets the literal name; with an `=` marker it targets the
    /// base name.
    pub fn invoke_with(&mut self, name: &str, value: impl Into<Incoming>) -> Value {
        let target = if self.contains_key(name) {
            normalize(name)
        } else {
            let request = Request::parse(name);
            match request.intent {
                Intent::Assign => request.base,
                _ => normalize(name),
            }
        };
        self.insert(target.as_str(), value);
        self.read(target.as_str())
    }

    /// Returns true if `name` is answerable as a property: a literal key
    /// exists, or the name ends with a recognized marker (whether or not the
    /// base key currently exists). A capability predicate, not an execution.
    pub fn responds_to(&self, name: &str) -> bool {
        self.contains_key(name) || Request::parse(name).intent != Intent::Read
    }

    /// Truthiness of the current value at `key`.
    ///
    /// A raw value test: an absent key is `false` even when a default
    /// specification is configured, as is a stored falsy value.
    pub fn truthy(&self, key: impl crate::key::AsKey) -> bool {
        self.get(key).map(Value::is_truthy).unwrap_or(false)
    }

    /// Reads `key`, first storing a new empty map of this map's kind when
    /// the key is absent. The existing value is returned as-is when present,
    /// whether or not it is a map.
    pub fn force(&mut self, key: impl crate::key::AsKey) -> &mut Value {
        let key = normalize(key);
        if !self.contains_key(key.as_str()) {
            let empty = Value::Map(PropMap::of_kind(self.kind()));
            self.store(key.clone(), empty);
        }
        self.get_mut(key.as_str()).expect("key exists after insert")
    }

    /// Reads `key`, returning a new empty map of this map's kind when the
    /// key is absent, without storing it. Side-effect-free.
    pub fn ephemeral(&self, key: impl crate::key::AsKey) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => Value::Map(PropMap::of_kind(self.kind())),
        }
    }
}
