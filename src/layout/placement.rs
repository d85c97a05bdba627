//! Per-word placement: size, rasterize, search outward from the center, shrink and retry.

use crate::foundation::clock::TimeBudget;
use crate::foundation::math::{RandomSource, shuffle};
use crate::layout::glyph::{self, GlyphInfo, GlyphRequest};
use crate::layout::grid::OccupancyGrid;
use crate::layout::radial::{RadialPoint, RadialPointCache};
use crate::layout::rotation::RotationPolicy;
use crate::layout::size::{WeightExtent, weight_to_size};
use crate::raster::GlyphRasterizer;

/// Weight multiplier applied on every shrink-to-fit retry.
pub const SHRINK_FACTOR: f64 = 0.75;

/// A shrink step that moves the mapped size by less than this drops the word.
pub const MIN_SHRINK_PROGRESS_PX: f64 = 0.01;

/// Why a word was not drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Mapped size at or below the minimum drawable size.
    BelowMinSize,
    /// Footprint larger than the grid while neither out-of-bound drawing nor shrinking is on.
    TooLarge,
    /// No free position at any radius.
    NoRoom,
    /// Time budget ran out while placing this word.
    TimedOut,
    /// The rasterizer failed to measure or render the word.
    RasterFailed,
    /// The draw was aborted before this word.
    NotReached,
}

/// Per-draw inputs of the search.
#[derive(Clone, Debug)]
pub struct PlacementParams {
    /// CSS family list.
    pub font_family: String,
    /// `[min, max]` font sizes.
    pub size_range: [f64; 2],
    /// Weight extent of the current list.
    pub extent: WeightExtent,
    /// Words mapping to this size or smaller are skipped.
    pub min_size: f64,
    /// Rasterizer floor (see [`glyph::detect_min_font_size`]).
    pub min_font_size: f64,
    /// Cell size in pixels.
    pub grid_size: u32,
    /// Largest search radius, in cells.
    pub max_radius: u32,
    /// Rotation sampling.
    pub rotation: RotationPolicy,
    /// Randomize candidate order within one radius.
    pub shuffle: bool,
    /// Accept footprints that leave the grid.
    pub draw_out_of_bound: bool,
    /// Retry with smaller weights when nothing fits.
    pub shrink_to_fit: bool,
}

/// Accepted grid position for one glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Top-left grid column of the glyph box.
    pub gx: i32,
    /// Top-left grid row of the glyph box.
    pub gy: i32,
    /// Radius at which it was found.
    pub radius: u32,
    /// Sample angle of the accepted point.
    pub theta: f64,
}

/// A word that found room.
#[derive(Clone, Debug)]
pub struct Found {
    /// Rendered footprint.
    pub info: GlyphInfo,
    /// Accepted position.
    pub at: Candidate,
    /// Weight after shrinking.
    pub weight: f64,
    /// Resolved CSS font weight.
    pub font_weight: String,
}

/// Result of placing one word.
#[derive(Clone, Debug)]
pub enum Placement {
    /// Found room; the caller draws and marks it.
    Placed(Box<Found>),
    /// Not drawn.
    Skipped(SkipReason),
}

/// First candidate that fits, scanning radii outward from the center.
///
/// Within one radius candidates are tried in cached order, or in a shuffled copy of it.
pub fn find_position(
    grid: &OccupancyGrid,
    radial: &mut RadialPointCache,
    info: &GlyphInfo,
    max_radius: u32,
    allow_out_of_bound: bool,
    shuffled: bool,
    rng: &mut dyn RandomSource,
) -> Option<Candidate> {
    let half_w = f64::from(info.gw) / 2.0;
    let half_h = f64::from(info.gh) / 2.0;
    for radius in 0..=max_radius {
        let cached = radial.points_at(radius);
        let copy: Vec<RadialPoint>;
        let points = if shuffled {
            copy = {
                let mut v = cached.to_vec();
                shuffle(&mut v, rng);
                v
            };
            &copy[..]
        } else {
            cached
        };

        for p in points {
            let gx = (p.x - half_w).floor() as i32;
            let gy = (p.y - half_h).floor() as i32;
            if grid.can_fit(gx, gy, &info.occupied, allow_out_of_bound) {
                return Some(Candidate {
                    gx,
                    gy,
                    radius,
                    theta: p.theta,
                });
            }
        }
    }
    None
}

/// One word's search, borrowing the draw's shared state.
pub struct Placer<'a, 'c> {
    /// Glyph source.
    pub rasterizer: &'a mut dyn GlyphRasterizer,
    /// Current occupancy.
    pub grid: &'a OccupancyGrid,
    /// Candidate cache, already prepared for this draw.
    pub radial: &'a mut RadialPointCache,
    /// Randomness for rotation and shuffling.
    pub rng: &'a mut dyn RandomSource,
    /// Per-word time budget.
    pub budget: &'a TimeBudget<'c>,
    /// Draw parameters.
    pub params: &'a PlacementParams,
}

impl Placer<'_, '_> {
    /// Place `text` with `weight`, shrinking when enabled.
    ///
    /// `font_weight` maps `(weight, font_size)` to a CSS font weight. The rotation is sampled
    /// once and kept across shrink retries.
    pub fn place(
        &mut self,
        text: &str,
        weight: f64,
        font_weight: &dyn Fn(f64, f64) -> String,
    ) -> Placement {
        let params = self.params;
        let rotation = params.rotation.sample(self.rng);
        let mut weight = weight;
        let mut last_size: Option<f64> = None;

        loop {
            let font_size = weight_to_size(weight, params.extent, params.size_range);
            if font_size.is_nan() || font_size <= params.min_size {
                return Placement::Skipped(SkipReason::BelowMinSize);
            }
            if let Some(prev) = last_size
                && prev - font_size < MIN_SHRINK_PROGRESS_PX
            {
                tracing::debug!(word = text, font_size, "shrinking no longer reduces size");
                return Placement::Skipped(SkipReason::NoRoom);
            }
            last_size = Some(font_size);

            let font_weight = font_weight(weight, font_size);
            let req = GlyphRequest {
                text,
                font_family: &params.font_family,
                font_weight: &font_weight,
                font_size,
                rotation,
            };
            let info = match glyph::acquire(
                &mut *self.rasterizer,
                &req,
                params.grid_size,
                params.min_font_size,
            ) {
                Ok(info) => info,
                Err(err) => {
                    tracing::warn!(word = text, error = %err, "glyph rasterization failed");
                    return Placement::Skipped(SkipReason::RasterFailed);
                }
            };

            if self.budget.exceeded() {
                return Placement::Skipped(SkipReason::TimedOut);
            }

            if !params.draw_out_of_bound
                && !params.shrink_to_fit
                && (info.bounds.width() > self.grid.width() as i32
                    || info.bounds.height() > self.grid.height() as i32)
            {
                return Placement::Skipped(SkipReason::TooLarge);
            }

            tracing::trace!(word = text, font_size, rotation, "searching");
            if let Some(at) = find_position(
                self.grid,
                self.radial,
                &info,
                params.max_radius,
                params.draw_out_of_bound,
                params.shuffle,
                &mut *self.rng,
            ) {
                return Placement::Placed(Box::new(Found {
                    info,
                    at,
                    weight,
                    font_weight,
                }));
            }

            if !params.shrink_to_fit {
                return Placement::Skipped(SkipReason::NoRoom);
            }
            weight *= SHRINK_FACTOR;
            tracing::debug!(word = text, weight, "no room, shrinking");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
