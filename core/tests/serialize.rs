use viewmark_core::{
    parse, parse_numeric, serialize_cartesian, serialize_geographic, CoordinateSpace,
    FragmentStyle, Point, ViewState, DEFAULT_PRECISION,
};

#[test]
fn geographic_uses_fixed_decimals_and_semicolons() {
    let state = ViewState::new(Point::from_lng_lat(10.5, 20.25), 3.0);
    assert_eq!(
        serialize_geographic(&state, DEFAULT_PRECISION),
        "lng=10.50000;lat=20.25000;zoom=3"
    );
}

#[test]
fn geographic_rounds_to_requested_precision() {
    let state = ViewState::new(Point::from_lng_lat(-122.419416, 37.774929), 12.5);
    assert_eq!(serialize_geographic(&state, 2), "lng=-122.42;lat=37.77;zoom=12.5");
}

#[test]
fn cartesian_is_unrounded_with_ampersands() {
    let state = ViewState::new(Point::new(0.123456789, 0.5), 1.75);
    assert_eq!(serialize_cartesian(&state), "x=0.123456789&y=0.5&zoom=1.75");
}

#[test]
fn geographic_round_trip_within_rounding() {
    let state = ViewState::new(Point::from_lng_lat(2.2945123456, 48.8583987654), 15.0);
    let parsed = parse(&serialize_geographic(&state, DEFAULT_PRECISION));
    let lng = parsed.number("lng").expect("lng");
    let lat = parsed.number("lat").expect("lat");
    assert!((lng - state.center.lng()).abs() <= 0.5e-5);
    assert!((lat - state.center.lat()).abs() <= 0.5e-5);
    assert_eq!(parsed.number("zoom"), Some(15.0));
}

#[test]
fn cartesian_round_trip_is_exact() {
    let state = ViewState::new(Point::new(1.0 / 3.0, 2.0 / 7.0), 0.1 + 0.2);
    let parsed = parse_numeric(&serialize_cartesian(&state));
    assert!(parsed.rejected.is_empty());
    assert_eq!(parsed.params.number("x"), Some(state.center.x));
    assert_eq!(parsed.params.number("y"), Some(state.center.y));
    assert_eq!(parsed.params.number("zoom"), Some(state.zoom));
}

#[test]
fn style_follows_coordinate_space() {
    assert_eq!(
        CoordinateSpace::Geographic.style(3),
        FragmentStyle::Geographic { precision: 3 }
    );
    assert_eq!(CoordinateSpace::Cartesian.style(3), FragmentStyle::Cartesian);
    assert_eq!(FragmentStyle::default().delimiter(), ';');
    assert_eq!(FragmentStyle::Cartesian.delimiter(), '&');
}

#[test]
fn style_decode_matches_its_serializer() {
    let state = ViewState::new(Point::new(4.0, -8.0), 2.0);
    let style = FragmentStyle::Cartesian;
    let decoded = style.decode(&style.serialize(&state));
    assert_eq!(decoded.number("x"), Some(4.0));
    assert_eq!(decoded.number("y"), Some(-8.0));
}

#[test]
fn cartesian_extremes_use_exponent_form_and_read_back() {
    let state = ViewState::new(Point::new(2e21, 3e-9), 1.0);
    let text = serialize_cartesian(&state);
    assert_eq!(text, "x=2e+21&y=3e-9&zoom=1");

    let params = FragmentStyle::Cartesian.decode(&text);
    assert_eq!(params.number("x"), Some(2e21));
    assert_eq!(params.number("y"), Some(3e-9));
}
