use super::*;
use crate::foundation::math::Rng64;

struct Seq(Vec<f64>, usize);

impl RandomSource for Seq {
    fn next_f64(&mut self) -> f64 {
        let v = self.0[self.1 % self.0.len()];
        self.1 += 1;
        v
    }
}

#[test]
fn zero_ratio_never_rotates_or_draws() {
    let mut rng = Seq(vec![0.0], 0);
    let p = RotationPolicy::new(0.0, -1.0, 1.0, 5);
    assert_eq!(p.sample(&mut rng), 0.0);
    assert_eq!(rng.1, 0);
}

#[test]
fn coin_above_ratio_keeps_word_upright() {
    let p = RotationPolicy::new(0.5, -1.0, 1.0, 0);
    assert_eq!(p.sample(&mut Seq(vec![0.75], 0)), 0.0);
}

#[test]
fn degenerate_range_returns_its_only_angle() {
    let p = RotationPolicy::new(1.0, 0.3, 0.3, 4);
    assert_eq!(p.sample(&mut Seq(vec![0.1], 0)), 0.3);
}

#[test]
fn stepped_angles_are_evenly_spaced() {
    let p = RotationPolicy::new(1.0, 1.0, -1.0, 3);
    assert_eq!(p.min, -1.0);
    assert_eq!(p.range, 2.0);
    assert_eq!(p.sample(&mut Seq(vec![0.0, 0.0], 0)), -1.0);
    assert_eq!(p.sample(&mut Seq(vec![0.0, 0.5], 0)), 0.0);
    assert_eq!(p.sample(&mut Seq(vec![0.0, 0.99], 0)), 1.0);
}

#[test]
fn single_step_yields_range_minimum() {
    let p = RotationPolicy::new(1.0, -0.5, 0.5, 1);
    assert_eq!(p.sample(&mut Seq(vec![0.0, 0.9], 0)), -0.5);
}

#[test]
fn continuous_samples_stay_in_range() {
    let p = RotationPolicy::new(1.0, -1.2, 1.2, 0);
    let mut rng = Rng64::new(7);
    for _ in 0..200 {
        let a = p.sample(&mut rng);
        assert!((-1.2..=1.2).contains(&a));
    }
}
