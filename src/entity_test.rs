use super::*;
use crate::editor::StyleEditor;
use serde_json::json;

const POINT: &str = r#"{"type":"point","id":"p1","isVisible":true,"location":{"lon":1,"lat":2,"alt":0}}"#;

const POINT_WITH_PROPERTIES: &str = r#"{"type":"point","id":"1031744e-2a0a-4538-8230-b15f4bcdfeb0","isVisible":true,"location":{"lon":34.81548607349395,"lat":31.958445584725023,"alt":0}, "properties": {"obj": { "number": 2.5, "integer": 2 }, "string": "string"}}"#;

const LINE: &str = r#"{"type":"line","id":"l1","isVisible":false,"name":"route","path":[{"lon":34.8155,"lat":31.9584,"alt":0},{"lon":34.8160,"lat":31.9590,"alt":0},{"lon":34.8163,"lat":31.9588,"alt":0}]}"#;

const POLYGON: &str = r#"{"type":"polygon","id":"g1","isVisible":true,"perimeter":[{"lon":34.8144,"lat":31.9590,"alt":0},{"lon":34.8136,"lat":31.9576,"alt":0},{"lon":34.8142,"lat":31.9573,"alt":0},{"lon":34.8144,"lat":31.9590,"alt":0}]}"#;

// =============================================================================
// Discriminated decoding
// =============================================================================

#[test]
fn point_decodes_with_location() {
    let entity = Entity::from_json(POINT).unwrap();
    assert_eq!(entity.kind(), EntityKind::Point);
    assert_eq!(entity.id(), "p1");
    assert!(entity.is_visible());
    assert_eq!(entity.name(), None);
    assert!(entity.properties().is_none());

    let point = entity.as_point().expect("point");
    assert_eq!(point.location(), Coordinates::with_alt(1.0, 2.0, 0.0).unwrap());
}

#[test]
fn unknown_discriminator_is_a_decode_failure() {
    let err = Entity::from_json(r#"{"type":"unknown","id":"x","isVisible":true}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn missing_discriminator_is_a_decode_failure() {
    assert!(Entity::from_json(r#"{"id":"x","isVisible":true,"location":{"lon":0,"lat":0}}"#).is_err());
}

#[test]
fn variant_fields_are_required() {
    assert!(Entity::from_json(r#"{"type":"line","id":"x","isVisible":true}"#).is_err());
}

#[test]
fn properties_stay_a_typed_bag() {
    let entity = Entity::from_json(POINT_WITH_PROPERTIES).unwrap();
    let props = entity.properties().expect("properties");
    assert_eq!(props.len(), 2);
    assert_eq!(props.get_str("string").unwrap(), Some("string"));
    assert_eq!(props.get("obj"), Some(&json!({"number": 2.5, "integer": 2})));
}

#[test]
fn null_properties_decode_as_absent() {
    let entity =
        Entity::from_json(r#"{"type":"point","id":"p","isVisible":true,"properties":null,"location":{"lon":0,"lat":0}}"#)
            .unwrap();
    assert!(entity.properties().is_none());
}

#[test]
fn line_exposes_path_accessors() {
    let entity = Entity::from_json(LINE).unwrap();
    assert!(!entity.is_visible());
    assert_eq!(entity.name(), Some("route"));

    let line = entity.as_line().expect("line");
    assert_eq!(line.len(), 3);
    assert_eq!(line.point_at(1), Some(Coordinates::new(34.8160, 31.9590).unwrap()));
    assert_eq!(line.point_at(3), None);
    assert!(line.length() >= 0.0);
}

#[test]
fn polygon_ring_is_closed() {
    let entity = Entity::from_json(POLYGON).unwrap();
    let polygon = entity.as_polygon().expect("polygon");
    assert!(polygon.is_closed());
    assert_eq!(polygon.perimeter().len(), 4);
    assert!(polygon.area().abs() < f64::EPSILON);
    assert!(polygon.perimeter_length() >= 0.0);
}

#[test]
fn missing_visibility_defaults_to_visible() {
    let entity = Entity::from_json(r#"{"type":"point","id":"p","location":{"lon":0,"lat":0}}"#).unwrap();
    assert!(entity.is_visible());
}

#[test]
fn encode_keeps_discriminator_and_wire_names() {
    let entity = Entity::from_json(LINE).unwrap();
    let json = serde_json::to_value(&entity).unwrap();
    assert_eq!(json["type"], "line");
    assert_eq!(json["isVisible"], false);
    assert_eq!(json["name"], "route");
    assert!(json.get("properties").is_none());

    let decoded: Entity = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entity);
}

// =============================================================================
// Editors
// =============================================================================

#[test]
fn edit_matches_variant_and_targets_id() {
    let point = Entity::from_json(POINT).unwrap().edit();
    assert!(matches!(point, Editor::Point(_)));
    assert_eq!(point.id(), "p1");

    assert!(matches!(Entity::from_json(LINE).unwrap().edit(), Editor::Line(_)));
    assert!(matches!(Entity::from_json(POLYGON).unwrap().edit(), Editor::Polygon(_)));
}

#[test]
fn default_point_icon_is_svg_data_uri() {
    assert!(DEFAULT_POINT_ICON.starts_with("data:image/svg+xml,<svg"));
    assert!(DEFAULT_POINT_ICON.ends_with("</svg>"));
}
