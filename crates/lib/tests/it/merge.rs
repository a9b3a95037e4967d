use propmap::{PropMap, Value};
use serde_json::json;

use crate::helpers::assert_keys;

#[test]
fn deep_update_recurses_into_existing_maps() {
    let mut map = PropMap::from_json(json!({"a": {"x": 1}}));
    map.deep_update([json!({"a": {"y": 2}})]);

    let a = map.get("a").and_then(Value::as_map).unwrap();
    assert_eq!(a.read("x"), 1);
    assert_eq!(a.read("y"), 2);
}

#[test]
fn deep_update_replaces_wholesale_on_shape_mismatch() {
    let mut map = PropMap::from_json(json!({"a": {"x": 1}}));
    map.deep_update([json!({"a": [1, 2]})]);

    let a = map.get("a").and_then(Value::as_list).unwrap();
    assert_eq!(a.len(), 2);

    // Scalar over map replaces too.
    let mut map = PropMap::from_json(json!({"a": {"x": 1}}));
    map.deep_update([json!({"a": 5})]);
    assert_eq!(map.read("a"), 5);
}

#[test]
fn deep_update_does_not_recurse_into_scalars() {
    let mut map = PropMap::from_json(json!({"a": 1}));
    map.deep_update([json!({"a": {"x": 1}})]);
    // Existing scalar is replaced by the wrapped incoming object.
    assert_eq!(map.dig(&["a", "x"]).unwrap(), &Value::Int(1));
}

#[test]
fn deep_merge_is_non_mutating() {
    let original = PropMap::from_json(json!({"a": {"x": 1}}));
    let merged = original.deep_merge([json!({"a": {"y": 2}})]);

    assert_eq!(original, PropMap::from_json(json!({"a": {"x": 1}})));
    assert_eq!(merged.dig(&["a", "y"]).unwrap(), &Value::Int(2));
    assert_eq!(merged.dig(&["a", "x"]).unwrap(), &Value::Int(1));
}

#[test]
fn deep_update_processes_sources_in_order() {
    let mut map = PropMap::new();
    map.deep_update([json!({"k": 1}), json!({"k": 2}), json!({"extra": 3})]);
    assert_eq!(map.read("k"), 2);
    assert_eq!(map.read("extra"), 3);
}

#[test]
fn resolver_sees_old_and_converted_incoming() {
    let mut map = PropMap::from_json(json!({"count": 1, "fresh": true}));
    let mut seen: Vec<String> = Vec::new();

    map.deep_update_with([json!({"count": 10, "new_key": 5})], |key, old, incoming| {
        seen.push(key.to_string());
        match (old.as_int(), incoming.as_int()) {
            (Some(a), Some(b)) => Value::Int(a + b),
            _ => incoming,
        }
    });

    // Resolver runs only for keys that already existed.
    assert_eq!(seen, vec!["count".to_string()]);
    assert_eq!(map.read("count"), 11);
    assert_eq!(map.read("new_key"), 5);
}

#[test]
fn resolver_applies_at_every_depth() {
    let mut map = PropMap::from_json(json!({"top": 1, "a": {"count": 1, "keep": true}}));
    map.deep_update_with([json!({"top": 10, "a": {"count": 10}})], |_, old, incoming| {
        match (old.as_int(), incoming.as_int()) {
            (Some(x), Some(y)) => Value::Int(x + y),
            _ => incoming,
        }
    });

    assert_eq!(map.read("top"), 11);
    assert_eq!(map.dig(&["a", "count"]).unwrap(), &Value::Int(11));
    assert_eq!(map.dig(&["a", "keep"]).unwrap(), &Value::Bool(true));
}

#[test]
fn resolver_result_is_converted_before_storage() {
    let mut map = PropMap::from_json(json!({"cfg": 1}));
    map.deep_update_with([json!({"cfg": 2})], |_, _, _| {
        Value::List(vec![Value::Int(1)].into())
    });
    assert!(map.get("cfg").and_then(Value::as_list).is_some());
}

#[test]
fn family_map_sources_replace_rather_than_recurse() {
    // Recursion requires a foreign incoming object; a family map replaces.
    let mut map = PropMap::from_json(json!({"a": {"x": 1}}));
    let source = PropMap::from_json(json!({"a": {"y": 2}}));
    map.deep_update([source]);

    let a = map.get("a").and_then(Value::as_map).unwrap();
    assert_eq!(a.get("x"), None);
    assert_eq!(a.read("y"), 2);
}

#[test]
fn shallow_update_never_recurses() {
    let mut map = PropMap::from_json(json!({"a": {"x": 1}, "b": 1}));
    map.update(json!({"a": {"y": 2}}));

    let a = map.get("a").and_then(Value::as_map).unwrap();
    assert_eq!(a.get("x"), None);
    assert_eq!(a.read("y"), 2);
    // Keys absent from the source are untouched.
    assert_eq!(map.read("b"), 1);
}

#[test]
fn shallow_merge_is_non_mutating() {
    let original = PropMap::from_json(json!({"a": 1}));
    let merged = original.merge(json!({"b": 2}));
    assert_eq!(original.len(), 1);
    assert_eq!(merged.read("a"), 1);
    assert_eq!(merged.read("b"), 2);
}

#[test]
fn replace_makes_key_set_exact() {
    let mut map = PropMap::from_json(json!({"a": 1, "b": 1}));
    map.replace(json!({"b": 2}));
    assert_keys(&map, &["b"]);
    assert_eq!(map.read("b"), 2);
}

#[test]
fn replace_normalizes_incoming_values() {
    let mut map = PropMap::from_json(json!({"a": 1}));
    map.replace(json!({"cfg": {"deep": {"x": 1}}}));
    assert_eq!(map.dig(&["cfg", "deep", "x"]).unwrap(), &Value::Int(1));
}

#[test]
fn merge_results_preserve_untouched_nested_identity() {
    let mut map = PropMap::from_json(json!({"a": {"keep": "me", "n": {"deep": 1}}}));
    map.deep_update([json!({"a": {"n": {"deeper": 2}}})]);

    assert_eq!(map.dig(&["a", "keep"]).unwrap(), "me");
    assert_eq!(map.dig(&["a", "n", "deep"]).unwrap(), &Value::Int(1));
    assert_eq!(map.dig(&["a", "n", "deeper"]).unwrap(), &Value::Int(2));
}
