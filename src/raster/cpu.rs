use std::collections::HashMap;

use crate::foundation::color::ColorDef;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::raster::fonts::{FaceHandle, FontResolver, ShapedLine, TextLayoutEngine};
use crate::raster::{
    AlphaMask, FontSpec, FrameRGBA, GlyphRasterizer, Surface, TextJob, affine_to_cpu,
    block::block_text_rect,
};

/// Shared text pipeline: font lookup, shaping and `vello_cpu` font handles.
struct TextPipeline {
    fonts: FontResolver,
    engine: TextLayoutEngine,
    font_data: HashMap<usvg::fontdb::ID, vello_cpu::peniko::FontData>,
}

impl TextPipeline {
    fn new(fonts: FontResolver) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            font_data: HashMap::new(),
        }
    }

    fn face(&mut self, font: &FontSpec) -> WordCloudResult<FaceHandle> {
        self.fonts.resolve(font).ok_or_else(|| {
            WordCloudError::raster(format!("no font face matches '{}'", font.family))
        })
    }

    fn shape(
        &mut self,
        text: &str,
        font: &FontSpec,
    ) -> WordCloudResult<(ShapedLine, vello_cpu::peniko::FontData)> {
        let face = self.face(font)?;
        let line = self
            .engine
            .shape_line(text, &face, font.numeric_weight(), font.size_px)?;
        let data = self
            .font_data
            .entry(face.id)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.data.to_vec()),
                    face.index,
                )
            })
            .clone();
        Ok((line, data))
    }

    fn fill(&mut self, ctx: &mut vello_cpu::RenderContext, job: &TextJob<'_>) -> WordCloudResult<()> {
        let (line, font) = self.shape(job.text, job.font)?;
        let local = Affine::translate((job.anchor.x, job.anchor.y - line.middle));
        ctx.set_transform(affine_to_cpu(job.transform * local));
        let glyphs = line.glyphs.iter().map(|&(id, x, y)| vello_cpu::Glyph { id, x, y });
        ctx.glyph_run(&font)
            .font_size(line.font_size)
            .fill_glyphs(glyphs);
        Ok(())
    }
}

fn dims_u16(width: u32, height: u32) -> WordCloudResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WordCloudError::raster("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WordCloudError::raster("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(WordCloudError::raster("surface dimensions must be > 0"));
    }
    Ok((w, h))
}

fn paint_of(color: ColorDef) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = color.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

/// Glyph rasterizer backed by Parley shaping and `vello_cpu`.
pub struct CpuRasterizer {
    text: TextPipeline,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRasterizer {
    /// Rasterizer resolving fonts from the system font directories.
    pub fn new() -> Self {
        Self::with_fonts(FontResolver::system())
    }

    /// Rasterizer over an explicit font database.
    pub fn with_fonts(fonts: FontResolver) -> Self {
        Self {
            text: TextPipeline::new(fonts),
            ctx: None,
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.text.fonts.face_count()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut TextPipeline, &mut vello_cpu::RenderContext) -> WordCloudResult<R>,
    ) -> WordCloudResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut self.text, &mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

impl Default for CpuRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for CpuRasterizer {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WordCloudResult<f64> {
        Ok(self.text.shape(text, font)?.0.width)
    }

    fn rasterize_alpha(
        &mut self,
        width: u32,
        height: u32,
        job: &TextJob<'_>,
    ) -> WordCloudResult<AlphaMask> {
        let (w, h) = dims_u16(width, height)?;
        self.with_ctx_mut(w, h, |text, ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            text.fill(ctx, job)?;
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            AlphaMask::from_rgba8(width, height, pixmap.data_as_u8_slice())
        })
    }
}

enum TextMode {
    Glyphs(Box<TextPipeline>),
    Blocks,
}

/// Drawing surface backed by one `vello_cpu` render context.
///
/// Operations accumulate until [`CpuSurface::render`] rasterizes them into a frame.
pub struct CpuSurface {
    width: u32,
    height: u32,
    ctx: vello_cpu::RenderContext,
    text: TextMode,
}

impl CpuSurface {
    /// Surface resolving fonts from the system font directories.
    pub fn new(width: u32, height: u32) -> WordCloudResult<Self> {
        Self::with_fonts(width, height, FontResolver::system())
    }

    /// Surface over an explicit font database.
    pub fn with_fonts(width: u32, height: u32, fonts: FontResolver) -> WordCloudResult<Self> {
        Self::build(width, height, TextMode::Glyphs(Box::new(TextPipeline::new(fonts))))
    }

    /// Surface drawing every word as em boxes, matching [`crate::BlockRasterizer`].
    pub fn with_block_text(width: u32, height: u32) -> WordCloudResult<Self> {
        Self::build(width, height, TextMode::Blocks)
    }

    fn build(width: u32, height: u32, text: TextMode) -> WordCloudResult<Self> {
        let (w, h) = dims_u16(width, height)?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(w, h),
            text,
        })
    }

    /// Rasterize everything drawn so far.
    pub fn render(&mut self) -> WordCloudResult<FrameRGBA> {
        let (w, h) = dims_u16(self.width, self.height)?;
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: ColorDef) -> WordCloudResult<()> {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint_of(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        Ok(())
    }

    fn fill_text(&mut self, job: &TextJob<'_>, color: ColorDef) -> WordCloudResult<()> {
        self.ctx.set_paint(paint_of(color));
        match &mut self.text {
            TextMode::Glyphs(text) => text
                .fill(&mut self.ctx, job)
                .map_err(|e| WordCloudError::surface(e.to_string())),
            TextMode::Blocks => {
                let r = block_text_rect(job);
                self.ctx.set_transform(affine_to_cpu(job.transform));
                self.ctx
                    .fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
                Ok(())
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorDef) -> WordCloudResult<()> {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint_of(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cpu.rs"]
mod tests;
