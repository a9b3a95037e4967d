//! Value conversion: the normalization engine for incoming data.
//!
//! Every value entering a map (construction, assignment, merge) passes through
//! [`convert_for`], which guarantees that any nested map or sequence stored
//! anywhere in the structure belongs to the container family. The resolution
//! rules are deliberately asymmetric:
//!
//! - a family map of the *receiver's own kind* is always duplicated;
//! - a family map of *another kind* is kept as-is, duplicated only on request,
//!   so a map can absorb values produced by sibling kinds without silently
//!   re-tagging them;
//! - a foreign JSON object is always wrapped into a brand-new map of the
//!   receiver's kind, entries normalized recursively;
//! - sequences (family or foreign) are rebuilt element by element;
//! - primitives pass through unchanged.

use crate::key::normalize;
use crate::kind::Kind;

use super::PropMap;
use super::list::List;
use super::value::Value;

/// A value on its way into a map: either already part of the container
/// family, or foreign JSON that still needs wrapping.
#[derive(Debug, Clone)]
pub enum Incoming {
    /// A value already expressed in the container family's types.
    Value(Value),
    /// Foreign data, normalized recursively during conversion.
    Foreign(serde_json::Value),
}

impl From<Value> for Incoming {
    fn from(value: Value) -> Self {
        Incoming::Value(value)
    }
}

impl From<PropMap> for Incoming {
    fn from(map: PropMap) -> Self {
        Incoming::Value(Value::Map(map))
    }
}

impl From<List> for Incoming {
    fn from(list: List) -> Self {
        Incoming::Value(Value::List(list))
    }
}

impl From<serde_json::Value> for Incoming {
    fn from(json: serde_json::Value) -> Self {
        Incoming::Foreign(json)
    }
}

macro_rules! impl_incoming_via_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Incoming {
            fn from(value: $t) -> Self {
                Incoming::Value(Value::from(value))
            }
        })*
    };
}

impl_incoming_via_value!(bool, i32, i64, u32, f64, String, &str);

/// Converts an incoming value for storage in a map of the given kind.
///
/// `duplicate` asks for an independent copy where the rules allow the
/// original through unchanged; it never affects foreign input, which is
/// rebuilt regardless.
pub(crate) fn convert_for(kind: Kind, incoming: Incoming, duplicate: bool) -> Value {
    match incoming {
        Incoming::Value(Value::Map(map)) => {
            if map.kind() == kind || duplicate {
                Value::Map(map.duplicate())
            } else {
                Value::Map(map)
            }
        }
        Incoming::Value(Value::List(list)) => Value::List(
            list.into_iter()
                .map(|item| convert_for(kind, Incoming::Value(item), false))
                .collect(),
        ),
        Incoming::Value(leaf) => leaf,
        Incoming::Foreign(json) => convert_foreign(kind, json),
    }
}

/// Rebuilds foreign JSON into family types, wrapping objects into maps of
/// the receiver's kind and arrays into lists, recursively.
fn convert_foreign(kind: Kind, json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| convert_foreign(kind, item))
                .collect(),
        ),
        serde_json::Value::Object(entries) => {
            let mut map = PropMap::of_kind(kind);
            for (key, value) in entries {
                let converted = convert_foreign(kind, value);
                map.store(normalize(key), converted);
            }
            Value::Map(map)
        }
    }
}
