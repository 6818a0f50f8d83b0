use super::*;

// =============================================================================
// Coordinates
// =============================================================================

#[test]
fn new_defaults_altitude_to_zero() {
    let c = Coordinates::new(34.8, 31.9).unwrap();
    assert!((c.lon() - 34.8).abs() < f64::EPSILON);
    assert!((c.lat() - 31.9).abs() < f64::EPSILON);
    assert!(c.alt().abs() < f64::EPSILON);
}

#[test]
fn out_of_range_axes_are_rejected() {
    assert!(matches!(Coordinates::new(180.5, 0.0), Err(ValidationError::Coordinate { axis: "lon", .. })));
    assert!(matches!(Coordinates::new(0.0, -90.1), Err(ValidationError::Coordinate { axis: "lat", .. })));
    assert!(Coordinates::new(-180.0, 90.0).is_ok());
}

#[test]
fn equality_is_componentwise() {
    let a = Coordinates::with_alt(1.0, 2.0, 3.0).unwrap();
    assert_eq!(a, Coordinates::with_alt(1.0, 2.0, 3.0).unwrap());
    assert_ne!(a, Coordinates::with_alt(1.0, 2.0, 4.0).unwrap());
}

#[test]
fn decodes_without_altitude() {
    let c: Coordinates = serde_json::from_str(r#"{"lon": 1, "lat": 2}"#).unwrap();
    assert_eq!(c, Coordinates::new(1.0, 2.0).unwrap());
}

#[test]
fn decode_rejects_out_of_range_latitude() {
    let result = serde_json::from_str::<Coordinates>(r#"{"lon": 1, "lat": 200, "alt": 0}"#);
    assert!(result.is_err());
}

#[test]
fn encodes_all_three_components() {
    let c = Coordinates::with_alt(1.5, 2.5, 10.0).unwrap();
    let json = serde_json::to_value(c).unwrap();
    assert_eq!(json, serde_json::json!({"lon": 1.5, "lat": 2.5, "alt": 10.0}));
}

#[test]
fn display_lists_lon_lat_alt() {
    let c = Coordinates::with_alt(1.0, 2.0, 3.0).unwrap();
    assert_eq!(c.to_string(), "Coordinates(1, 2, 3)");
}

#[test]
fn path_length_of_short_paths_is_zero() {
    assert!(path_length(&[]).abs() < f64::EPSILON);
    assert!(path_length(&[Coordinates::new(0.0, 0.0).unwrap()]).abs() < f64::EPSILON);
}

// =============================================================================
// Rectangle
// =============================================================================

#[test]
fn from_bounds_places_corners() {
    let rect = Rectangle::from_bounds(33.4, 34.2, 29.45, 35.9).unwrap();
    assert_eq!(rect.north_west(), Coordinates::new(34.2, 33.4).unwrap());
    assert_eq!(rect.south_east(), Coordinates::new(35.9, 29.45).unwrap());
    assert!((rect.north() - 33.4).abs() < f64::EPSILON);
    assert!((rect.west() - 34.2).abs() < f64::EPSILON);
    assert!((rect.south() - 29.45).abs() < f64::EPSILON);
    assert!((rect.east() - 35.9).abs() < f64::EPSILON);
}

#[test]
fn rectangle_equality_compares_corners() {
    let a = Rectangle::from_bounds(10.0, 20.0, 5.0, 25.0).unwrap();
    let b = Rectangle::new(Coordinates::new(20.0, 10.0).unwrap(), Coordinates::new(25.0, 5.0).unwrap());
    assert_eq!(a, b);
}

#[test]
fn rectangle_wire_form_uses_camel_case_corners() {
    let json = r#"{"northWest": {"lon": 34.2, "lat": 33.4, "alt": 0}, "southEast": {"lon": 35.9, "lat": 29.45, "alt": 0}}"#;
    let rect: Rectangle = serde_json::from_str(json).unwrap();
    assert_eq!(rect, Rectangle::from_bounds(33.4, 34.2, 29.45, 35.9).unwrap());

    let encoded = serde_json::to_value(rect).unwrap();
    assert!(encoded.get("northWest").is_some());
    assert!(encoded.get("southEast").is_some());
}
