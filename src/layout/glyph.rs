//! Glyph acquisition: measure a word, render it off-screen and reduce the coverage to grid cells.

use crate::foundation::core::{Affine, Point};
use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::raster::{AlphaMask, FontSpec, GlyphRasterizer, TextJob};

const PROBE_START_PX: u32 = 20;
const PROBE_FAMILY: &str = "sans-serif";
const FULLWIDTH_W: &str = "\u{FF37}";

/// Smallest font size the rasterizer renders faithfully, or `0` when it has no floor.
///
/// Walks down from 20 px measuring a full-width and a narrow glyph; the first size at which
/// neither width changes any more is one below the floor.
pub fn detect_min_font_size(rasterizer: &mut dyn GlyphRasterizer) -> WordCloudResult<f64> {
    let mut previous: Option<(f64, f64)> = None;
    for size in (1..=PROBE_START_PX).rev() {
        let font = FontSpec::new(PROBE_FAMILY, "normal", f64::from(size));
        let wide = rasterizer.measure_text(FULLWIDTH_W, &font)?;
        let narrow = rasterizer.measure_text("m", &font)?;
        if previous == Some((wide, narrow)) {
            return Ok(f64::from(size + 1));
        }
        previous = Some((wide, narrow));
    }
    Ok(0.0)
}

/// Render multiplier for sizes under the rasterizer floor: `1`, or the smallest even `mu` with
/// `mu * font_size >= min_font_size`.
pub fn scale_factor(font_size: f64, min_font_size: f64) -> f64 {
    if font_size >= min_font_size || font_size <= 0.0 {
        return 1.0;
    }
    let mut mu = 2.0;
    while mu * font_size < min_font_size {
        mu += 2.0;
    }
    mu
}

/// Grid-unit extrema of the occupied cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlyphBounds {
    /// Smallest occupied row.
    pub top: i32,
    /// Largest occupied column.
    pub right: i32,
    /// Largest occupied row.
    pub bottom: i32,
    /// Smallest occupied column.
    pub left: i32,
}

impl GlyphBounds {
    /// Columns spanned.
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Rows spanned.
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }
}

/// What to render for one placement attempt.
#[derive(Clone, Debug)]
pub struct GlyphRequest<'a> {
    /// Word text.
    pub text: &'a str,
    /// CSS family list.
    pub font_family: &'a str,
    /// CSS weight.
    pub font_weight: &'a str,
    /// Mapped font size in pixels.
    pub font_size: f64,
    /// Rotation in radians; positive turns counter-clockwise on screen.
    pub rotation: f64,
}

/// Rendered footprint of one word at one size and rotation.
#[derive(Clone, Debug)]
pub struct GlyphInfo {
    /// Render multiplier (see [`scale_factor`]).
    pub mu: f64,
    /// Occupied cells relative to the glyph's top-left grid origin.
    pub occupied: Vec<(i32, i32)>,
    /// Extrema of `occupied`.
    pub bounds: GlyphBounds,
    /// Glyph box width in cells.
    pub gw: i32,
    /// Glyph box height in cells.
    pub gh: i32,
    /// Text anchor offset from the glyph center, unscaled.
    pub fill_offset: (f64, f64),
    /// Measured text width, unscaled.
    pub fill_width: f64,
    /// Estimated text height, unscaled.
    pub fill_height: f64,
    /// Mapped font size.
    pub font_size: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Font used for every fill of this glyph (size already multiplied by `mu`).
    pub font: FontSpec,
}

impl GlyphInfo {
    /// Text anchor in the glyph's local (rotated, `mu`-scaled) frame.
    pub fn anchor(&self) -> Point {
        let (ox, oy) = self.fill_offset;
        Point::new(ox * self.mu, (oy + self.font_size * 0.5) * self.mu)
    }

    /// Local frame centered on pixel `center` of the target.
    fn frame_at(&self, center: Point) -> Affine {
        Affine::scale(1.0 / self.mu)
            * Affine::translate((center.x * self.mu, center.y * self.mu))
            * Affine::rotate(-self.rotation)
    }

    /// Transform for filling this glyph with its top-left grid origin at `(gx, gy)`.
    pub fn draw_transform(&self, gx: i32, gy: i32, grid_size: u32) -> Affine {
        let g = f64::from(grid_size);
        self.frame_at(Point::new(
            (f64::from(gx) + f64::from(self.gw) / 2.0) * g,
            (f64::from(gy) + f64::from(self.gh) / 2.0) * g,
        ))
    }

    /// Text job for filling this glyph with its top-left grid origin at `(gx, gy)`.
    pub fn draw_job<'a>(&'a self, text: &'a str, gx: i32, gy: i32, grid_size: u32) -> TextJob<'a> {
        TextJob {
            text,
            font: &self.font,
            transform: self.draw_transform(gx, gy, grid_size),
            anchor: self.anchor(),
        }
    }
}

/// Measure and rasterize `req`, reducing the coverage to grid cells of `grid_size` pixels.
///
/// The scratch surface is sized to the rotated bounding box of a generous estimate of the text
/// box (one text height of padding on each side, three text heights tall).
pub fn acquire(
    rasterizer: &mut dyn GlyphRasterizer,
    req: &GlyphRequest<'_>,
    grid_size: u32,
    min_font_size: f64,
) -> WordCloudResult<GlyphInfo> {
    let g = f64::from(grid_size);
    let mu = scale_factor(req.font_size, min_font_size);
    let font = FontSpec::new(req.font_family, req.font_weight, req.font_size * mu);

    let fw = rasterizer.measure_text(req.text, &font)? / mu;
    let fh = (req.font_size * mu)
        .max(rasterizer.measure_text("m", &font)?)
        .max(rasterizer.measure_text(FULLWIDTH_W, &font)?)
        / mu;

    let box_w = (fw + fh * 2.0) / g;
    let box_h = (fh * 3.0) / g;
    let box_w = box_w.ceil() * g;
    let box_h = box_h.ceil() * g;

    let (sin, cos) = (req.rotation.sin().abs(), req.rotation.cos().abs());
    let cgh = ((box_w * sin + box_h * cos) / g).ceil().max(1.0) as i32;
    let cgw = ((box_w * cos + box_h * sin) / g).ceil().max(1.0) as i32;
    let scratch_side = |cells: i32| {
        u32::try_from(cells)
            .ok()
            .and_then(|c| c.checked_mul(grid_size))
            .ok_or_else(|| {
                WordCloudError::raster(format!(
                    "glyph box of {cells} cells at grid size {grid_size} is too large"
                ))
            })
    };
    let width = scratch_side(cgw)?;
    let height = scratch_side(cgh)?;

    let mut info = GlyphInfo {
        mu,
        occupied: Vec::new(),
        bounds: GlyphBounds {
            top: cgh / 2,
            right: cgw / 2,
            bottom: cgh / 2,
            left: cgw / 2,
        },
        gw: cgw,
        gh: cgh,
        fill_offset: (-fw / 2.0, -fh * 0.4),
        fill_width: fw,
        fill_height: fh,
        font_size: req.font_size,
        rotation: req.rotation,
        font,
    };

    let job = TextJob {
        text: req.text,
        font: &info.font,
        transform: info.frame_at(Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0)),
        anchor: info.anchor(),
    };
    let mask = rasterizer.rasterize_alpha(width, height, &job)?;
    let (occupied, bounds) = scan_cells(&mask, cgw, cgh, grid_size, info.bounds);
    info.occupied = occupied;
    info.bounds = bounds;
    Ok(info)
}

/// Any non-zero alpha in a cell marks the whole cell; scanning of that cell stops at the first hit.
fn scan_cells(
    mask: &AlphaMask,
    cgw: i32,
    cgh: i32,
    grid_size: u32,
    mut bounds: GlyphBounds,
) -> (Vec<(i32, i32)>, GlyphBounds) {
    let g = grid_size as i32;
    let mut occupied = Vec::new();
    for gx in (0..cgw).rev() {
        for gy in (0..cgh).rev() {
            let hit = (0..g).rev().any(|y| {
                (0..g).rev().any(|x| {
                    mask.alpha((gx * g + x) as u32, (gy * g + y) as u32) != 0
                })
            });
            if !hit {
                continue;
            }
            occupied.push((gx, gy));
            bounds.left = bounds.left.min(gx);
            bounds.right = bounds.right.max(gx);
            bounds.top = bounds.top.min(gy);
            bounds.bottom = bounds.bottom.max(gy);
        }
    }
    (occupied, bounds)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/glyph.rs"]
mod tests;
