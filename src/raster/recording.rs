use crate::foundation::color::ColorDef;
use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::WordCloudResult;
use crate::raster::{FontSpec, Surface, TextJob};

/// One recorded surface operation.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    /// `clear(color)`.
    Clear(ColorDef),
    /// `fill_text(job, color)`, with the job copied out.
    Text {
        /// Filled text.
        text: String,
        /// Font used.
        font: FontSpec,
        /// Local-to-surface transform.
        transform: Affine,
        /// Local anchor.
        anchor: Point,
        /// Fill color.
        color: ColorDef,
    },
    /// `fill_rect(rect, color)`.
    Rect(Rect, ColorDef),
}

/// Surface that records every call instead of drawing.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    /// Empty recording for a `width * height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Calls since the last `clear` (the `clear` itself included).
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Recorded text fills, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &SurfaceCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Text { .. }))
    }

    /// Recorded rectangle fills.
    pub fn rects(&self) -> impl Iterator<Item = (&Rect, &ColorDef)> {
        self.calls.iter().filter_map(|c| match c {
            SurfaceCall::Rect(r, color) => Some((r, color)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: ColorDef) -> WordCloudResult<()> {
        self.calls.clear();
        self.calls.push(SurfaceCall::Clear(color));
        Ok(())
    }

    fn fill_text(&mut self, job: &TextJob<'_>, color: ColorDef) -> WordCloudResult<()> {
        self.calls.push(SurfaceCall::Text {
            text: job.text.to_owned(),
            font: job.font.clone(),
            transform: job.transform,
            anchor: job.anchor,
            color,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorDef) -> WordCloudResult<()> {
        self.calls.push(SurfaceCall::Rect(rect, color));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/recording.rs"]
mod tests;
