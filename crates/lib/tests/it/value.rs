//! Snapshot value model: capture, typed access, and serialization.

use driftwatch::value::{List, Map, Value, ValueError};
use serde::Serialize;

use crate::helpers::officer_form;

#[derive(Serialize)]
struct Filing {
    name: String,
    shares: i64,
    ratio: f64,
    active: bool,
    note: Option<String>,
    officers: Vec<Officer>,
}

#[derive(Serialize)]
struct Officer {
    name: String,
    role: String,
}

fn sample_filing() -> Filing {
    Filing {
        name: "Sample Ventures Inc.".into(),
        shares: 1000,
        ratio: 0.25,
        active: true,
        note: None,
        officers: vec![
            Officer {
                name: "Ada Lovelace".into(),
                role: "director".into(),
            },
            Officer {
                name: "Grace Hopper".into(),
                role: "secretary".into(),
            },
        ],
    }
}

#[test]
fn capture_from_serialize_preserves_shape() {
    let snapshot = Map::from_serialize(&sample_filing()).unwrap();

    assert_eq!(snapshot.get_as::<&str>("name"), Some("Sample Ventures Inc."));
    assert_eq!(snapshot.get_as::<i64>("shares"), Some(1000));
    assert_eq!(snapshot.get_as::<f64>("ratio"), Some(0.25));
    assert_eq!(snapshot.get_as::<bool>("active"), Some(true));
    assert_eq!(snapshot.get("note"), Some(&Value::Null));

    let officers = snapshot.get("officers").and_then(Value::as_list).unwrap();
    assert_eq!(officers.len(), 2);
}

#[test]
fn capture_rejects_non_map_roots() {
    let err = Map::from_serialize(&vec![1, 2, 3]).unwrap_err();
    assert!(err.is_capture_error());
    assert_eq!(err.module(), "value");
}

#[test]
fn path_access_reaches_into_lists() {
    let snapshot = Map::from_serialize(&sample_filing()).unwrap();

    assert_eq!(
        snapshot.get_at("officers.1.name"),
        Some(&Value::Text("Grace Hopper".into()))
    );
    assert_eq!(snapshot.get_at("officers.2.name"), None);
    assert_eq!(snapshot.get_at("officers.one.name"), None);
}

#[test]
fn typed_extraction_reports_mismatches() {
    let form = officer_form();
    let value = form.get("name").unwrap();

    let err = i64::try_from(value).unwrap_err();
    assert!(matches!(err, ValueError::TypeMismatch { .. }));
    assert!(err.is_type_error());
}

#[test]
fn values_compare_with_primitives_directly() {
    let form = officer_form();
    assert_eq!(form.get("name"), Some(&Value::Text("Ada Lovelace".into())));
    assert!(*form.get("name").unwrap() == "Ada Lovelace");
    assert!("Ada Lovelace" == *form.get("name").unwrap());
}

#[test]
fn serde_representation_is_plain_json() {
    let mut map = Map::new();
    map.set("name", "Ada");
    map.set("age", 36i64);
    map.set("tags", List::from(vec!["a", "b"]));

    let json = serde_json::to_string(&Value::Map(map.clone())).unwrap();
    assert_eq!(json, r#"{"age":36,"name":"Ada","tags":["a","b"]}"#);

    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Value::Map(map));
}

#[test]
fn json_string_output_matches_serde() {
    let snapshot = Map::from_serialize(&sample_filing()).unwrap();
    let via_display = snapshot.to_json_string();
    let via_serde = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(via_display, via_serde);
}

#[test]
fn list_edits_round_trip() {
    let mut list = List::new();
    list.push("first");
    list.push("second");

    assert_eq!(list.set(1, "changed"), Some(Value::Text("second".into())));
    assert_eq!(list.set(5, "out of range"), None);
    assert_eq!(list.remove(0), Some(Value::Text("first".into())));
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0), Some(&Value::Text("changed".into())));
}
