use super::*;

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(43);
    assert_ne!(Rng64::new(42).next_u64(), c.next_u64());
}

#[test]
fn rng_samples_stay_in_unit_interval() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.next_f64();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = Rng64::new(9);
    let mut v: Vec<u32> = (0..50).collect();
    shuffle(&mut v, &mut rng);
    let mut sorted = v.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    assert_ne!(v, sorted);
}

struct Constant(f64);

impl RandomSource for Constant {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

#[test]
fn shuffle_with_zero_draws_rotates_front_to_back() {
    // j is always 0: each step swaps the current tail with the head.
    let mut v = vec![1, 2, 3];
    shuffle(&mut v, &mut Constant(0.0));
    assert_eq!(v, vec![2, 3, 1]);
}

#[test]
fn shuffle_handles_empty_and_single() {
    let mut rng = Rng64::new(1);
    let mut empty: Vec<u8> = vec![];
    shuffle(&mut empty, &mut rng);
    let mut one = vec![5];
    shuffle(&mut one, &mut rng);
    assert_eq!(one, vec![5]);
}
