use crate::foundation::math::RandomSource;

/// How words are rotated.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RotationPolicy {
    /// Probability that a word is rotated at all.
    pub ratio: f64,
    /// Lower end of the range, radians.
    pub min: f64,
    /// Width of the range, radians.
    pub range: f64,
    /// Number of discrete angles; `0` samples the range continuously.
    pub steps: u32,
}

impl RotationPolicy {
    /// Policy over `[a, b]` (either order) in radians.
    pub fn new(ratio: f64, a: f64, b: f64, steps: u32) -> Self {
        Self {
            ratio,
            min: a.min(b),
            range: (a - b).abs(),
            steps,
        }
    }

    /// Never rotate.
    pub fn none() -> Self {
        Self::new(0.0, 0.0, 0.0, 0)
    }

    /// Draw one angle.
    ///
    /// A single step has no spacing to divide by and yields the range minimum.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f64 {
        if self.ratio == 0.0 {
            return 0.0;
        }
        if rng.next_f64() > self.ratio {
            return 0.0;
        }
        if self.range == 0.0 {
            return self.min;
        }
        match self.steps {
            0 => self.min + rng.next_f64() * self.range,
            1 => self.min,
            n => {
                let step = (rng.next_f64() * f64::from(n)).floor();
                self.min + step * self.range / f64::from(n - 1)
            }
        }
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/rotation.rs"]
mod tests;
