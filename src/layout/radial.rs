use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::layout::shape::{Shape, ShapeKey};

/// One search candidate, in grid units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialPoint {
    /// Grid x coordinate (fractional).
    pub x: f64,
    /// Grid y coordinate (fractional).
    pub y: f64,
    /// Sample angle in radians, before the shape distortion.
    pub theta: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CacheKey {
    center: (f64, f64),
    ellipticity: f64,
    shape: ShapeKey,
}

/// Lazily filled `radius -> points` table.
///
/// Entries depend on the center, the shape and the ellipticity; [`RadialPointCache::prepare`]
/// drops every entry when any of them changes.
#[derive(Debug, Default)]
pub struct RadialPointCache {
    key: Option<CacheKey>,
    center: (f64, f64),
    ellipticity: f64,
    shape: Shape,
    points: HashMap<u32, Vec<RadialPoint>>,
}

impl RadialPointCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the cache to a center/shape/ellipticity, invalidating stale entries.
    pub fn prepare(&mut self, center: (f64, f64), shape: &Shape, ellipticity: f64) {
        let key = CacheKey {
            center,
            ellipticity,
            shape: shape.cache_key(),
        };
        if self.key != Some(key) {
            if self.key.is_some() {
                tracing::trace!("radial point cache invalidated");
            }
            self.points.clear();
            self.key = Some(key);
            self.center = center;
            self.ellipticity = ellipticity;
            self.shape = shape.clone();
        }
    }

    /// Number of cached radii.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ordered candidates at `radius` (`8 * radius` samples; the center alone for radius 0).
    ///
    /// The returned slice is shared with later calls: shuffle a copy, not the slice.
    pub fn points_at(&mut self, radius: u32) -> &[RadialPoint] {
        let Self {
            center,
            ellipticity,
            shape,
            points,
            ..
        } = self;
        points
            .entry(radius)
            .or_insert_with(|| generate(radius, *center, shape, *ellipticity))
    }
}

fn generate(radius: u32, center: (f64, f64), shape: &Shape, ellipticity: f64) -> Vec<RadialPoint> {
    let (cx, cy) = center;
    if radius == 0 {
        return vec![RadialPoint {
            x: cx,
            y: cy,
            theta: 0.0,
        }];
    }

    let total = radius * 8;
    let r = f64::from(radius);
    let mut out = Vec::with_capacity(total as usize);
    for t in (0..total).rev() {
        let theta = f64::from(t) / f64::from(total) * TAU;
        let rx = if shape.is_circle() {
            1.0
        } else {
            shape.radius_at(theta)
        };
        out.push(RadialPoint {
            x: cx + r * rx * (-theta).cos(),
            y: cy + r * rx * (-theta).sin() * ellipticity,
            theta,
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/radial.rs"]
mod tests;
