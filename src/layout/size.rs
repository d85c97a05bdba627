/// `(min, max)` over the weights of one word list.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeightExtent {
    /// Smallest weight in the list.
    pub min: f64,
    /// Largest weight in the list.
    pub max: f64,
}

impl WeightExtent {
    /// Extent of `weights`, or `None` for an empty sequence.
    pub fn of(weights: impl IntoIterator<Item = f64>) -> Option<Self> {
        weights.into_iter().fold(None, |acc, w| match acc {
            None => Some(Self { min: w, max: w }),
            Some(e) => Some(Self {
                min: e.min.min(w),
                max: e.max.max(w),
            }),
        })
    }

    /// `true` when every weight is the same value.
    pub fn is_degenerate(self) -> bool {
        self.min == self.max
    }
}

/// Map `weight` linearly from `extent` onto `size_range` (`[min, max]` in pixels).
///
/// A degenerate extent maps every weight to `size_range[0]`.
pub fn weight_to_size(weight: f64, extent: WeightExtent, size_range: [f64; 2]) -> f64 {
    let [size_min, size_max] = size_range;
    if extent.is_degenerate() {
        return size_min;
    }
    size_min + (weight - extent.min) * (size_max - size_min) / (extent.max - extent.min)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/size.rs"]
mod tests;
