use propmap::{Kind, PropMap, Value};
use serde_json::json;

#[test]
fn base_kind_rejects_suppression() {
    let err = Kind::BASE.enable_suppression(&["merge"]).unwrap_err();
    assert!(err.is_config_error());
    assert_eq!(err.module(), "kind");
}

#[test]
fn derived_kind_accepts_suppression() {
    let kind = Kind::define("SuppressedSettings", Kind::BASE);
    kind.enable_suppression(&["merge"]).unwrap();
    assert!(kind.is_suppressed("merge"));
    assert!(!kind.is_suppressed("invert"));
}

#[test]
fn definition_snapshot_is_a_copy_not_a_reference() {
    let parent = Kind::define("ItSnapshotParent", Kind::BASE);
    let before = Kind::define("ItChildBefore", parent);
    parent.enable_suppression(&["merge"]).unwrap();
    let after = Kind::define("ItChildAfter", parent);

    assert!(!before.is_suppressed("merge"));
    assert!(after.is_suppressed("merge"));
}

#[test]
fn derived_operations_preserve_the_receivers_kind() {
    let kind = Kind::define("ItDerivedOps", Kind::BASE);
    let map = PropMap::from_json_of_kind(kind, json!({"a": 1, "b": null, "c": {"x": 1}}));

    assert_eq!(map.duplicate().kind(), kind);
    assert_eq!(map.compact().kind(), kind);
    assert_eq!(map.invert().kind(), kind);
    assert_eq!(map.slice(&["a"]).kind(), kind);
    assert_eq!(map.filter_select(|_, _| true).kind(), kind);
    assert_eq!(map.filter_reject(|_, _| false).kind(), kind);
    assert_eq!(map.transform_values(|v| v.clone()).kind(), kind);
    assert_eq!(map.transform_keys(str::to_string).kind(), kind);
    assert_eq!(map.merge(json!({"d": 1})).kind(), kind);
    assert_eq!(map.deep_merge([json!({"c": {"y": 2}})]).kind(), kind);
}

#[test]
fn nested_wrapping_uses_the_receivers_kind() {
    let kind = Kind::define("ItNestedWrap", Kind::BASE);
    let mut map = PropMap::of_kind(kind);
    map.insert("cfg", json!({"inner": {"deep": 1}}));

    let inner = map.dig(&["cfg", "inner"]).and_then(Value::as_map).unwrap();
    assert_eq!(inner.kind(), kind);
}

#[test]
fn force_create_spawns_the_receivers_kind() {
    let kind = Kind::define("ItForceKind", Kind::BASE);
    let mut map = PropMap::of_kind(kind);
    let created = map.invoke("nested!");
    assert_eq!(created.as_map().unwrap().kind(), kind);
    assert_eq!(map.ephemeral("ghost").as_map().unwrap().kind(), kind);
}

#[test]
fn sibling_kind_values_are_absorbed_without_retagging() {
    let sibling = Kind::define("ItSiblingKind", Kind::BASE);
    let mut inner = PropMap::of_kind(sibling);
    inner.insert("x", 1);

    let mut map = PropMap::new();
    map.insert("child", inner);

    let stored = map.get("child").and_then(Value::as_map).unwrap();
    assert_eq!(stored.kind(), sibling);
}

#[test]
fn reserved_key_writes_proceed_despite_the_diagnostic() {
    // The collision guard is advisory only; the write lands either way.
    let mut map = PropMap::new();
    map.insert("merge", "shadowing");
    assert_eq!(map.read("merge"), "shadowing");

    let suppressed = Kind::define("ItQuietKind", Kind::BASE);
    suppressed.enable_suppression(&[]).unwrap();
    let mut quiet = PropMap::of_kind(suppressed);
    quiet.insert("keys", 1);
    assert_eq!(quiet.read("keys"), 1);
}
