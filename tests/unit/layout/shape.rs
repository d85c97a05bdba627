use super::*;

#[test]
fn names_roundtrip_through_registry() {
    for shape in BuiltinShape::ALL {
        assert_eq!(BuiltinShape::from_name(shape.name()), Some(shape));
    }
    assert_eq!(
        BuiltinShape::from_name("triangle"),
        Some(BuiltinShape::TriangleUpright)
    );
    assert_eq!(BuiltinShape::from_name("hexagon"), None);
}

#[test]
fn unknown_names_fall_back_to_circle() {
    assert!(Shape::from_name("blob").is_circle());
    assert!(!Shape::from_name("star").is_circle());
}

#[test]
fn circle_is_identity() {
    for i in 0..16 {
        let theta = f64::from(i) * PI / 8.0;
        assert_eq!(BuiltinShape::Circle.radius_at(theta), 1.0);
    }
}

#[test]
fn square_touches_unit_at_axes_and_grows_at_corners() {
    let s = BuiltinShape::Square;
    assert!((s.radius_at(0.0) - 1.0).abs() < 1e-12);
    assert!((s.radius_at(PI / 2.0) - 1.0).abs() < 1e-12);
    assert!((s.radius_at(PI / 4.0) - 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn diamond_is_unit_at_vertices_and_shrinks_between() {
    let s = BuiltinShape::Diamond;
    assert!((s.radius_at(0.0) - 1.0).abs() < 1e-12);
    assert!((s.radius_at(PI / 4.0) - 1.0 / 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn cardioid_vanishes_at_quarter_turn() {
    let s = BuiltinShape::Cardioid;
    assert!(s.radius_at(PI / 2.0).abs() < 1e-12);
    assert!((s.radius_at(3.0 * PI / 2.0) - 2.0).abs() < 1e-12);
}

#[test]
fn builtin_shapes_are_finite_and_non_negative_on_samples() {
    for shape in BuiltinShape::ALL {
        // Skip exact axis angles where the square's 1/|sin| branch is infinite before `min`.
        for i in 1..360 {
            let theta = f64::from(i) / 360.0 * 2.0 * PI + 1e-3;
            let r = shape.radius_at(theta);
            assert!(r.is_finite(), "{} at {theta}", shape.name());
            assert!(r >= 0.0, "{} at {theta}", shape.name());
        }
    }
}

#[test]
fn custom_shape_passes_through() {
    let s = Shape::custom(|theta| theta * 2.0);
    assert!(!s.is_circle());
    assert_eq!(s.radius_at(1.5), 3.0);
}

#[test]
fn cache_key_distinguishes_custom_functions() {
    let a = Shape::custom(|_| 1.0);
    let b = Shape::custom(|_| 2.0);
    assert_eq!(a.cache_key(), a.clone().cache_key());
    assert_ne!(a.cache_key(), b.cache_key());
    assert_eq!(
        Shape::from_name("star").cache_key(),
        Shape::Builtin(BuiltinShape::Star).cache_key()
    );
}
