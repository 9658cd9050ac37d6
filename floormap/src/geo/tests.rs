use super::*;

#[test]
fn test_distance_to_self_is_zero() {
    let tokyo = LatLon::new(35.6812, 139.7671);
    assert_eq!(distance_m(tokyo, tokyo), 0.0);
}

#[test]
fn test_distance_is_symmetric() {
    let a = LatLon::new(35.0, 139.0);
    let b = LatLon::new(35.1, 139.1);
    let ab = distance_m(a, b);
    let ba = distance_m(b, a);
    assert!((ab - ba).abs() < 1e-6);
}

#[test]
fn test_one_degree_longitude_at_equator() {
    let dist = distance_m(LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0));
    // 2πR / 360
    assert!((dist - 111_319.49).abs() < 1.0, "got {}", dist);
}

#[test]
fn test_longitude_shrinks_with_latitude() {
    let at_equator = distance_m(LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0));
    let at_sixty = distance_m(LatLon::new(60.0, 0.0), LatLon::new(60.0, 1.0));
    assert!((at_sixty - at_equator / 2.0).abs() < 100.0);
}

#[test]
fn test_distance_across_antimeridian() {
    let west = LatLon::new(0.0, 179.5);
    let east = LatLon::new(0.0, -179.5);
    let dist = distance_m(west, east);
    assert!((dist - 111_319.49).abs() < 1.0, "got {}", dist);
}

#[test]
fn test_antipodal_points_do_not_overflow() {
    let dist = distance_m(LatLon::new(0.0, 0.0), LatLon::new(0.0, 180.0));
    assert!((dist - PI * EARTH_RADIUS_M).abs() < 1.0);
}

#[test]
fn test_radians_to_degrees() {
    assert_eq!(radians_to_degrees(PI), 180.0);
    assert_eq!(radians_to_degrees(0.0), 0.0);
    assert!((radians_to_degrees(PI / 2.0) - 90.0).abs() < 1e-12);
}

#[test]
fn test_try_new_rejects_out_of_range() {
    assert_eq!(
        LatLon::try_new(91.0, 0.0),
        Err(GeoError::InvalidLatitude(91.0))
    );
    assert_eq!(
        LatLon::try_new(0.0, -181.0),
        Err(GeoError::InvalidLongitude(-181.0))
    );
    assert!(LatLon::try_new(f64::NAN, 0.0).is_err());
    assert!(LatLon::try_new(35.68, 139.75).is_ok());
}

#[test]
fn test_error_messages() {
    let msg = GeoError::InvalidLatitude(95.0).to_string();
    assert!(msg.contains("95"));
    assert!(msg.contains("-90"));
}

#[test]
fn test_display() {
    assert_eq!(LatLon::new(35.0, 139.0).to_string(), "35.000000, 139.000000");
}

#[test]
fn test_from_tuple() {
    let point: LatLon = (35.01, 139.0).into();
    assert_eq!(point.latitude, 35.01);
    assert_eq!(point.longitude, 139.0);
}
