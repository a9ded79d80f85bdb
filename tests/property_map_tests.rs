//! Integration tests for property maps.
//!
//! These tests exercise the public map API end to end: insertion order,
//! overwrite and pop behaviour, the JSON wire form, and decoding failures.

use automation_provider::property::{
    DecodeError, Expected, OrderedPropertyMap, Property, PropertyMap, PropertyType,
    UnorderedPropertyMap,
};
use serde_json::json;

fn names(map: &OrderedPropertyMap) -> Vec<&str> {
    map.keys().collect()
}

fn descriptor(value: serde_json::Value) -> Property {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_round_trip_preserves_entries_and_order() {
    let entries = vec![
        ("some", Property::string().with_title("Some")),
        ("other", Property::integer().with_default(3)),
        ("another", Property::boolean()),
        ("yet more", Property::array(Property::string())),
        ("latest", Property::reference("/resources/network")),
    ];

    let mut map = OrderedPropertyMap::new();
    for (name, value) in entries.clone() {
        assert!(map.set(name, value));
    }

    let encoded = map.encode().unwrap();
    let mut decoded = OrderedPropertyMap::new();
    decoded.decode(&encoded).unwrap();

    let expected: Vec<(String, Property)> = entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    assert_eq!(decoded.items(), expected);
    assert_eq!(decoded, map);
}

#[test]
fn test_overwrite_keeps_position() {
    let mut map: OrderedPropertyMap = [
        ("a", Property::string()),
        ("b", Property::string()),
        ("c", Property::string()),
    ]
    .into_iter()
    .collect();

    assert!(!map.set("b", Property::integer()));

    assert_eq!(names(&map), ["a", "b", "c"]);
    assert_eq!(
        map.get("b").and_then(Property::property_type),
        Some(PropertyType::Integer)
    );
}

#[test]
fn test_pop_then_set_moves_to_end() {
    let mut map: OrderedPropertyMap = [
        ("a", Property::string()),
        ("b", Property::string()),
        ("c", Property::string()),
    ]
    .into_iter()
    .collect();

    assert!(map.pop("a").is_some());
    assert!(map.pop("a").is_none());
    assert!(map.set("a", Property::boolean()));

    assert_eq!(names(&map), ["b", "c", "a"]);
}

#[test]
fn test_wire_order_differs_from_sorted_order() {
    let input = br#"{"zeta":{"type":"string"},"alpha":{"type":"string"},"mid":{"type":"string"}}"#;

    let map = OrderedPropertyMap::from_slice(input).unwrap();

    assert_eq!(names(&map), ["zeta", "alpha", "mid"]);
    assert_eq!(map.encode().unwrap(), input.to_vec());
}

#[test]
fn test_nested_object_properties_keep_order() {
    let input = json!({
        "app": {
            "type": "object",
            "title": "Application",
            "properties": {
                "port": {"type": "integer"},
                "host": {"type": "string"},
                "debug": {"type": "boolean"}
            },
            "required": ["host"]
        }
    });
    let bytes = serde_json::to_vec(&input).unwrap();

    let map = OrderedPropertyMap::from_slice(&bytes).unwrap();

    let Some(Property::Object(app)) = map.get("app") else {
        panic!("expected an object property");
    };
    let nested: Vec<&str> = app.properties.keys().collect();
    assert_eq!(nested, ["port", "host", "debug"]);
    assert_eq!(app.required, ["host"]);
}

// ============================================================================
// Empty maps and zero values
// ============================================================================

#[test]
fn test_empty_map_round_trip() {
    let map = OrderedPropertyMap::new();
    assert_eq!(map.encode().unwrap(), b"{}");

    let mut decoded = OrderedPropertyMap::new();
    decoded.set("stale", Property::string());
    decoded.decode(b"{}").unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_absent_name_yields_zero_value() {
    let map = OrderedPropertyMap::new();
    assert!(map.get("missing").is_none());
    assert_eq!(map.get_or_default("missing"), Property::default());
}

// ============================================================================
// Decoding failures
// ============================================================================

#[test]
fn test_decode_failures_name_the_expectation() {
    let cases: [(&[u8], Expected); 5] = [
        (b"[]", Expected::ObjectOpen),
        (br#"{"a" {"type":"string"}}"#, Expected::Colon),
        (br#"{"a":{"type":"string"} "b":{}}"#, Expected::CommaOrObjectClose),
        (br#"{"a":"#, Expected::Value),
        (br#"{"a":{"type":"string"}}x"#, Expected::EndOfInput),
    ];

    for (input, expected) in cases {
        let err = OrderedPropertyMap::from_slice(input).unwrap_err();
        assert_eq!(
            err.expected(),
            Some(expected),
            "input {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_failed_decode_leaves_map_untouched() {
    let mut map = OrderedPropertyMap::new();
    map.set("kept", Property::string());

    let err = map
        .decode(br#"{"fresh":{"type":"string"},"broken":{"type":"widget"}}"#)
        .unwrap_err();

    assert!(matches!(err, DecodeError::InvalidProperty { ref name, .. } if name == "broken"));
    assert_eq!(names(&map), ["kept"]);
}

// ============================================================================
// Shared contract
// ============================================================================

fn exercise<M: PropertyMap>(mut map: M) -> M {
    assert!(map.set("b", Property::string()));
    assert!(map.set("a", Property::integer()));
    assert!(!map.set("b", Property::boolean()));
    assert_eq!(map.len(), 2);
    assert!(map.pop("a").is_some());
    assert!(map.get("a").is_none());
    map
}

#[test]
fn test_both_maps_honour_the_shared_contract() {
    let ordered = exercise(OrderedPropertyMap::new());
    let unordered = exercise(UnorderedPropertyMap::new());

    assert_eq!(ordered.encode().unwrap(), unordered.encode().unwrap());
}

#[test]
fn test_descriptor_validation_through_map() {
    let map = OrderedPropertyMap::from_slice(
        br#"{"cpu":{"type":"integer","minimum":1,"maximum":16},"zone":{"type":"string","enum":["east","west"]}}"#,
    )
    .unwrap();

    let cpu = map.get_or_default("cpu");
    assert!(cpu.validate(&json!(8)).is_ok());
    assert!(cpu.validate(&json!(0)).is_err());

    let zone = descriptor(json!({"type": "string", "enum": ["east", "west"]}));
    assert_eq!(map.get("zone"), Some(&zone));
    assert!(zone.validate(&json!("north")).is_err());
}
