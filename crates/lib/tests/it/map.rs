use propmap::{Kind, PropMap, Value};
use serde_json::json;

use crate::helpers::{assert_keys, assert_uniform_nesting, nested_json};

#[test]
fn construction_normalizes_foreign_input_deeply() {
    let map = PropMap::from_json(nested_json());
    assert_uniform_nesting(&Value::Map(map.clone()), Kind::BASE);

    assert_eq!(map.read("name"), "Alice");
    assert_eq!(map.read("age"), 30);
    assert_eq!(map.read("active"), true);
    assert_eq!(map.read("nothing"), Value::Null);

    let geo = map.dig(&["address", "geo"]).and_then(Value::as_map).unwrap();
    assert_eq!(geo.read("lat"), 1);
}

#[test]
fn normalized_keys_unify_writes_and_reads() {
    let mut map = PropMap::new();
    map.insert(7_i64, "seven");
    assert_eq!(map.read("7"), "seven");

    map.insert("7", "overwritten");
    assert_eq!(map.len(), 1);
    assert_eq!(map.read(7_u32), "overwritten");
}

#[test]
fn read_falls_back_to_fixed_default() {
    let mut map = PropMap::with_default("unknown");
    map.insert("known", 1);
    assert_eq!(map.read("known"), 1);
    assert_eq!(map.read("missing"), "unknown");
    // fetch ignores the default specification.
    assert_eq!(map.fetch("missing"), None);
}

#[test]
fn read_falls_back_to_factory_with_missing_key() {
    let map = PropMap::with_default_factory(|_, key| Value::Text(format!("<{key}>")));
    assert_eq!(map.read("absent"), "<absent>");
}

#[test]
fn fetch_or_converts_the_fallback() {
    let map = PropMap::new();
    let fallback = map.fetch_or("missing", json!({"a": 1}));
    let inner = fallback.as_map().unwrap();
    assert_eq!(inner.read("a"), 1);
}

#[test]
fn insertion_order_is_preserved() {
    let mut map = PropMap::new();
    for key in ["zeta", "alpha", "mid"] {
        map.insert(key, 1);
    }
    assert_keys(&map, &["zeta", "alpha", "mid"]);

    map.remove("alpha");
    assert_keys(&map, &["zeta", "mid"]);

    let dup = map.duplicate();
    assert_keys(&dup, &["zeta", "mid"]);
}

#[test]
fn compact_drops_null_entries_only() {
    let mut map = PropMap::new();
    map.insert("a", 1);
    map.insert("b", Value::Null);
    map.insert("c", false);

    let compacted = map.compact();
    assert_keys(&compacted, &["a", "c"]);
    assert_eq!(compacted.kind(), map.kind());
    // Receiver is untouched.
    assert_eq!(map.len(), 3);
}

#[test]
fn invert_stringifies_keys_and_values() {
    let mut map = PropMap::new();
    map.insert("one", 1);
    map.insert("yes", true);

    let inverted = map.invert();
    assert_eq!(inverted.read("1"), "one");
    assert_eq!(inverted.read("true"), "yes");
}

#[test]
fn filters_partition_entries() {
    let mut map = PropMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);

    let selected = map.filter_select(|_, v| v.as_int().unwrap_or(0) > 1);
    assert_keys(&selected, &["b", "c"]);

    let rejected = map.filter_reject(|_, v| v.as_int().unwrap_or(0) > 1);
    assert_keys(&rejected, &["a"]);
}

#[test]
fn slice_keeps_only_present_requested_keys() {
    let map = PropMap::from_json(json!({"a": 1, "b": 2, "c": 3}));
    let sliced = map.slice(&["a", "c", "missing"]);
    assert_keys(&sliced, &["a", "c"]);
}

#[test]
fn values_at_applies_defaults_per_key() {
    let mut map = PropMap::with_default(0);
    map.insert("a", 1);
    let values = map.values_at(&["a", "missing"]);
    assert_eq!(values, vec![Value::Int(1), Value::Int(0)]);
}

#[test]
fn transform_values_converts_results() {
    let map = PropMap::from_json(json!({"a": 1, "b": 2}));
    let doubled = map.transform_values(|v| Value::Int(v.as_int().unwrap_or(0) * 2));
    assert_eq!(doubled.read("a"), 2);
    assert_eq!(doubled.read("b"), 4);
    // Foreign results are normalized on the way in.
    let wrapped = map.transform_values(|v| json!({"was": v.to_json()}));
    assert_eq!(wrapped.dig(&["a", "was"]).unwrap(), &Value::Int(1));
}

#[test]
fn transform_keys_normalizes_new_keys() {
    let map = PropMap::from_json(json!({"a": 1}));
    let upper = map.transform_keys(|k| k.to_uppercase());
    assert_eq!(upper.read("A"), 1);
    assert!(!upper.contains_key("a"));
}

#[test]
fn dig_traverses_maps_and_lists() {
    let map = PropMap::from_json(nested_json());
    assert_eq!(map.dig(&["address", "city"]).unwrap(), "Springfield");
    assert_eq!(map.dig(&["tags", "0"]).unwrap(), "admin");
    assert_eq!(map.dig(&["tags", "1", "role"]).unwrap(), "owner");
    assert_eq!(map.dig(&["tags", "2", "1"]).unwrap(), &Value::Int(2));
    // Across scalars or bad indices navigation stops.
    assert_eq!(map.dig(&["name", "x"]), None);
    assert_eq!(map.dig(&["tags", "nine"]), None);
}

#[test]
fn assignment_normalizes_nested_foreign_values() {
    let mut map = PropMap::new();
    map.insert("cfg", json!({"limits": {"max": 10}, "flags": [true]}));
    assert_uniform_nesting(&Value::Map(map.clone()), Kind::BASE);
    assert_eq!(map.dig(&["cfg", "limits", "max"]).unwrap(), &Value::Int(10));
}

#[test]
fn equality_is_content_based() {
    let a = PropMap::from_json(json!({"x": 1, "y": 2}));
    let b = PropMap::from_json(json!({"y": 2, "x": 1}));
    assert_eq!(a, b);

    let kind = Kind::define("EqualityKind", Kind::BASE);
    let c = PropMap::from_json_of_kind(kind, json!({"x": 1, "y": 2}));
    assert_eq!(a, c);
}

#[test]
fn serde_round_trip_preserves_structure() {
    let map = PropMap::from_json(nested_json());
    let serialized = serde_json::to_string(&map).unwrap();
    let restored: PropMap = serde_json::from_str(&serialized).unwrap();
    assert_eq!(map, restored);
    assert_eq!(map.to_json(), restored.to_json());
}

#[test]
fn from_json_str_parses_and_normalizes() {
    let map = PropMap::from_json_str(r#"{"a": {"b": [1, 2]}}"#).unwrap();
    assert_uniform_nesting(&Value::Map(map.clone()), Kind::BASE);
    assert_eq!(map.dig(&["a", "b", "1"]).unwrap(), &Value::Int(2));
}

#[test]
fn from_json_str_surfaces_parse_errors() {
    let err = PropMap::from_json_str("not json").unwrap_err();
    assert!(err.is_serialization_error());
    assert_eq!(err.module(), "serialize");
}

#[test]
fn from_iterator_goes_through_ordinary_writes() {
    let map: PropMap = [("a", 1), ("b", 2)].into_iter().collect();
    assert_eq!(map.read("a"), 1);
    assert_eq!(map.len(), 2);
}
