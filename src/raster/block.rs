//! Font-free rasterizer: every character is an em-high box.
//!
//! Widths are 0.6 em for ordinary characters and 1 em for full-width ones (CJK and above).
//! Output depends only on the text, the size and the transform, which makes layouts exactly
//! reproducible on machines without fonts.

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::WordCloudResult;
use crate::raster::{AlphaMask, Capabilities, FontSpec, GlyphRasterizer, TextJob, em_box_span};

const NARROW_EM: f64 = 0.6;
const WIDE_EM: f64 = 1.0;

fn char_em(c: char) -> f64 {
    if u32::from(c) >= 0x2E80 {
        WIDE_EM
    } else {
        NARROW_EM
    }
}

/// Advance width of `text` at `size_px`.
pub(crate) fn block_text_width(text: &str, size_px: f64) -> f64 {
    text.chars().map(char_em).sum::<f64>() * size_px
}

fn text_rect(job: &TextJob<'_>, size_px: f64) -> Rect {
    let sized = FontSpec {
        size_px,
        ..job.font.clone()
    };
    let (top, bottom) = em_box_span(job.anchor, &sized);
    let x0 = job.anchor.x;
    Rect::new(x0, top, x0 + block_text_width(job.text, size_px), bottom)
}

/// Local-space box covered by `job`.
pub(crate) fn block_text_rect(job: &TextJob<'_>) -> Rect {
    text_rect(job, job.font.size_px)
}

/// Deterministic em-box rasterizer.
#[derive(Clone, Debug)]
pub struct BlockRasterizer {
    min_resolvable_px: f64,
    capabilities: Capabilities,
}

impl BlockRasterizer {
    /// Rasterizer that honors every requested size.
    pub fn new() -> Self {
        Self {
            min_resolvable_px: 0.0,
            capabilities: Capabilities::full(),
        }
    }

    /// Clamp every size below `px` up to `px`, like a host with a minimum font size setting.
    pub fn with_min_resolvable_px(mut self, px: f64) -> Self {
        self.min_resolvable_px = px.max(0.0);
        self
    }

    /// Report a reduced capability set.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn effective_size(&self, size_px: f64) -> f64 {
        size_px.max(self.min_resolvable_px)
    }
}

impl Default for BlockRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WordCloudResult<f64> {
        Ok(block_text_width(text, self.effective_size(font.size_px)))
    }

    fn rasterize_alpha(
        &mut self,
        width: u32,
        height: u32,
        job: &TextJob<'_>,
    ) -> WordCloudResult<AlphaMask> {
        let mut mask = AlphaMask::new(width, height);
        let local = text_rect(job, self.effective_size(job.font.size_px));
        if local.width() <= 0.0 || local.height() <= 0.0 {
            return Ok(mask);
        }

        let corners = [
            job.transform * Point::new(local.x0, local.y0),
            job.transform * Point::new(local.x1, local.y0),
            job.transform * Point::new(local.x1, local.y1),
            job.transform * Point::new(local.x0, local.y1),
        ];
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let x_start = min_x.floor().max(0.0) as u32;
        let y_start = min_y.floor().max(0.0) as u32;
        let x_end = (max_x.ceil().max(0.0) as u32).min(width);
        let y_end = (max_y.ceil().max(0.0) as u32).min(height);

        let inverse = job.transform.inverse();
        for y in y_start..y_end {
            for x in x_start..x_end {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if p.x >= local.x0 && p.x < local.x1 && p.y >= local.y0 && p.y < local.y1 {
                    mask.data[y as usize * width as usize + x as usize] = 255;
                }
            }
        }
        Ok(mask)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/block.rs"]
mod tests;
