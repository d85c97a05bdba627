use super::*;

#[test]
fn extent_of_empty_is_none() {
    assert_eq!(WeightExtent::of(std::iter::empty()), None);
}

#[test]
fn extent_tracks_min_and_max() {
    let e = WeightExtent::of([3.0, 100.0, 1.0, 42.0]).unwrap();
    assert_eq!(e, WeightExtent { min: 1.0, max: 100.0 });
    assert!(!e.is_degenerate());
}

#[test]
fn degenerate_extent_maps_to_range_start() {
    let e = WeightExtent::of([42.0]).unwrap();
    let s = weight_to_size(42.0, e, [10.0, 50.0]);
    assert_eq!(s, 10.0);

    let e = WeightExtent::of([7.0, 7.0, 7.0]).unwrap();
    for w in [0.5, 7.0, 1e9] {
        let s = weight_to_size(w, e, [16.0, 68.0]);
        assert_eq!(s, 16.0);
        assert!(!s.is_nan());
    }
}

#[test]
fn endpoints_map_to_range_endpoints() {
    let e = WeightExtent::of([1.0, 100.0]).unwrap();
    assert_eq!(weight_to_size(100.0, e, [10.0, 50.0]), 50.0);
    assert_eq!(weight_to_size(1.0, e, [10.0, 50.0]), 10.0);
}

#[test]
fn interior_weights_are_strictly_inside_and_monotonic() {
    let e = WeightExtent::of([1.0, 100.0]).unwrap();
    let mut prev = 10.0;
    for w in 2..100 {
        let s = weight_to_size(f64::from(w), e, [10.0, 50.0]);
        assert!(s > 10.0 && s < 50.0, "size {s} for weight {w}");
        assert!(s > prev);
        prev = s;
    }
}

#[test]
fn repeated_three_quarter_shrink_crosses_min_size() {
    let e = WeightExtent::of([10.0, 100.0]).unwrap();
    let min_size = 8.0;
    for start in [0.001, 1.0, 10.0, 55.5, 100.0, 1e6] {
        let mut w: f64 = start;
        let mut steps = 0;
        while weight_to_size(w, e, [10.0, 50.0]) > min_size {
            w *= 0.75;
            steps += 1;
            assert!(steps < 10_000, "no termination from {start}");
        }
    }
}
