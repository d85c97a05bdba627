//! Glyph rasterization and drawing surfaces.
//!
//! The layout core never touches fonts or pixels directly. It asks a [`GlyphRasterizer`] for
//! text widths and alpha masks, and hands accepted placements to a [`Surface`].

/// Font-free em-box backend.
pub mod block;
/// `parley` + `vello_cpu` backend.
pub mod cpu;
/// Font lookup by CSS-like family list and weight.
pub mod fonts;
/// Surface that records calls.
pub mod recording;

use crate::foundation::color::ColorDef;
use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul};
use crate::foundation::error::{WordCloudError, WordCloudResult};

/// Font request: family list, weight and pixel size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Comma-separated, optionally quoted family list (`"Arial", sans-serif`).
    pub family: String,
    /// CSS weight (`normal`, `bold`, `100`..`900`).
    pub weight: String,
    /// Em size in pixels.
    pub size_px: f64,
}

impl FontSpec {
    /// Build a font request.
    pub fn new(family: impl Into<String>, weight: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
            size_px,
        }
    }

    /// Numeric CSS weight; unknown keywords resolve to 400.
    pub fn numeric_weight(&self) -> u16 {
        match self.weight.trim() {
            "normal" => 400,
            "bold" => 700,
            "lighter" => 300,
            "bolder" => 800,
            w => w
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(1.0, 1000.0) as u16)
                .unwrap_or(400),
        }
    }

    /// Family names with quotes stripped, in priority order.
    pub fn families(&self) -> Vec<String> {
        self.family
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim())
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// One text fill: `text` drawn with `font`, positioned at `anchor` in the local space of
/// `transform`.
///
/// The anchor uses "middle" baseline semantics: `anchor.x` is the left edge of the text and
/// `anchor.y` the vertical middle of the em box.
#[derive(Clone, Debug)]
pub struct TextJob<'a> {
    /// Text to fill.
    pub text: &'a str,
    /// Font to fill with.
    pub font: &'a FontSpec,
    /// Local-to-surface transform.
    pub transform: Affine,
    /// Left/middle anchor in local coordinates.
    pub anchor: Point,
}

/// Single-channel coverage read back from a scratch surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major alpha bytes, `width * height` long.
    pub data: Vec<u8>,
}

impl AlphaMask {
    /// Fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Alpha at `(x, y)`; zero outside the mask.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Extract the alpha channel of tightly packed RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> WordCloudResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(WordCloudError::raster(format!(
                "rgba buffer is {} bytes, expected {expected}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: rgba.chunks_exact(4).map(|px| px[3]).collect(),
        })
    }
}

/// Operations a rasterizer backend provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Text width measurement.
    pub measure_text: bool,
    /// Filling text into a scratch surface.
    pub fill_text: bool,
    /// Reading pixels back from the scratch surface.
    pub read_pixels: bool,
}

impl Capabilities {
    /// Every capability present.
    pub fn full() -> Self {
        Self {
            measure_text: true,
            fill_text: true,
            read_pixels: true,
        }
    }

    /// `true` when the layout core can run on this backend.
    pub fn is_complete(self) -> bool {
        self.measure_text && self.fill_text && self.read_pixels
    }
}

/// Text measurement and off-screen glyph rendering.
pub trait GlyphRasterizer {
    /// Capabilities of this backend.
    fn capabilities(&self) -> Capabilities {
        Capabilities::full()
    }

    /// Advance width of `text` in pixels.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WordCloudResult<f64>;

    /// Fill `job` into a fresh transparent `width * height` scratch surface and read back alpha.
    fn rasterize_alpha(
        &mut self,
        width: u32,
        height: u32,
        job: &TextJob<'_>,
    ) -> WordCloudResult<AlphaMask>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for Box<R> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WordCloudResult<f64> {
        (**self).measure_text(text, font)
    }

    fn rasterize_alpha(
        &mut self,
        width: u32,
        height: u32,
        job: &TextJob<'_>,
    ) -> WordCloudResult<AlphaMask> {
        (**self).rasterize_alpha(width, height, job)
    }
}

/// The surface placed words are drawn onto.
pub trait Surface {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Discard previous content and fill everything with `color`.
    fn clear(&mut self, color: ColorDef) -> WordCloudResult<()>;

    /// Fill text.
    fn fill_text(&mut self, job: &TextJob<'_>, color: ColorDef) -> WordCloudResult<()>;

    /// Fill an axis-aligned rectangle in surface pixels.
    fn fill_rect(&mut self, rect: Rect, color: ColorDef) -> WordCloudResult<()>;
}

/// Whether `rasterizer` can drive a layout: every capability present and a probe measurement
/// succeeds with a finite width.
pub fn probe_support(rasterizer: &mut dyn GlyphRasterizer) -> bool {
    if !rasterizer.capabilities().is_complete() {
        return false;
    }
    let probe = FontSpec::new("sans-serif", "normal", 20.0);
    match rasterizer.measure_text("m", &probe) {
        Ok(w) => w.is_finite(),
        Err(err) => {
            tracing::debug!(error = %err, "rasterizer probe failed");
            false
        }
    }
}

/// A rendered surface as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let p = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            };
            out.extend_from_slice(&p.to_straight_rgba());
        }
        out
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> WordCloudResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            WordCloudError::Other(anyhow::anyhow!("write png '{}': {e}", path.display()))
        })
    }
}

/// Middle-baseline em box of `font` anchored at `anchor`: `(top, bottom)` in local y.
pub(crate) fn em_box_span(anchor: Point, font: &FontSpec) -> (f64, f64) {
    let half = font.size_px / 2.0;
    (anchor.y - half, anchor.y + half)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mod.rs"]
mod tests;
