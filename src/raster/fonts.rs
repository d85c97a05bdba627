use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::raster::FontSpec;

/// A resolved font face: raw font bytes plus the face index inside the collection.
#[derive(Clone, Debug)]
pub struct FaceHandle {
    pub(crate) id: fontdb::ID,
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

/// Font lookup over a `fontdb` database.
///
/// Family lists are matched in order; generic names (`sans-serif`, `serif`, `monospace`,
/// `cursive`, `fantasy`) map to `fontdb` generics. When nothing matches, the first face in the
/// database is used so that explicitly loaded font files always win over "no font".
pub struct FontResolver {
    db: fontdb::Database,
    cache: HashMap<(String, u16), Option<FaceHandle>>,
}

impl FontResolver {
    /// Resolver over the system font directories.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    /// Resolver with no fonts loaded.
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            cache: HashMap::new(),
        }
    }

    /// Load a `.ttf`/`.otf`/`.ttc` file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> WordCloudResult<()> {
        let path = path.as_ref();
        self.db
            .load_font_file(path)
            .with_context(|| format!("load font file '{}'", path.display()))?;
        self.cache.clear();
        Ok(())
    }

    /// Load a font from memory.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.cache.clear();
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Best face for `font`, or `None` when the database is empty.
    pub fn resolve(&mut self, font: &FontSpec) -> Option<FaceHandle> {
        let key = (font.family.clone(), font.numeric_weight());
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let names = font.families();
        let mut families: Vec<fontdb::Family<'_>> = names.iter().map(|n| family_of(n)).collect();
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(key.1),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id));

        let handle = id.and_then(|id| {
            self.db
                .with_face_data(id, |data, index| FaceHandle {
                    id,
                    data: Arc::new(data.to_vec()),
                    index,
                })
        });
        if handle.is_none() {
            tracing::debug!(family = %font.family, "no font face available");
        }
        self.cache.insert(key, handle.clone());
        handle
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::system()
    }
}

fn family_of(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => fontdb::Family::SansSerif,
        "serif" => fontdb::Family::Serif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

/// Single-line shaping result, in layout coordinates (origin at the top-left of the line box).
#[derive(Clone, Debug)]
pub(crate) struct ShapedLine {
    /// Advance width including trailing whitespace.
    pub(crate) width: f64,
    /// Distance from the line top to the middle of the em box.
    pub(crate) middle: f64,
    /// `(glyph id, x, y)` with `y` on the baseline.
    pub(crate) glyphs: Vec<(u32, f32, f32)>,
    pub(crate) font_size: f32,
}

/// Stateful helper that shapes single-line text with Parley.
///
/// Faces are registered with the Parley collection once and remembered by `fontdb` id.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<fontdb::ID, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_name(&mut self, face: &FaceHandle) -> WordCloudResult<String> {
        if let Some(name) = self.families.get(&face.id) {
            return Ok(name.clone());
        }
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.data.to_vec()), None);
        let family_id = registered
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| WordCloudError::raster("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WordCloudError::raster("registered font family has no name"))?
            .to_string();
        self.families.insert(face.id, name.clone());
        Ok(name)
    }

    /// Shape `text` on one line with `face` at `size_px` and CSS `weight`.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        face: &FaceHandle,
        weight: u16,
        size_px: f64,
    ) -> WordCloudResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WordCloudError::raster("font size must be finite and > 0"));
        }
        let family_name = self.family_name(face)?;
        let size = size_px as f32;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut middle = f64::from(size) / 2.0;
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            middle = f64::from(m.baseline) - f64::from(m.ascent - m.descent) / 2.0;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| (g.id, g.x, g.y)));
            }
        }

        Ok(ShapedLine {
            width: f64::from(layout.full_width()),
            middle,
            glyphs,
            font_size: size,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/fonts.rs"]
mod tests;
