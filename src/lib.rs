//! `wordcloud` lays out weighted word lists onto a fixed-size surface.
//!
//! Words are drawn in list order. Each one is sized from its weight, rendered off-screen,
//! reduced to a coarse cell footprint and placed at the first free position found while
//! searching outward from the center along a (possibly shape-distorted) spiral of rings:
//!
//! - Build [`Settings`] from [`WordCloudOptions`] (JSON or code)
//! - Create a [`WordCloud`] over a [`GlyphRasterizer`] and a [`WordList`]
//! - [`WordCloud::draw`] onto any [`Surface`] and inspect the [`DrawReport`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cloud;
mod foundation;
mod layout;
/// Glyph rasterizers and drawing surfaces.
pub mod raster;

pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::color::ColorDef;
pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{WordCloudError, WordCloudResult};
pub use crate::foundation::math::{RandomSource, Rng64, shuffle};

pub use crate::layout::glyph::{
    GlyphBounds, GlyphInfo, GlyphRequest, acquire as acquire_glyph, detect_min_font_size,
    scale_factor,
};
pub use crate::layout::grid::OccupancyGrid;
pub use crate::layout::placement::{Candidate, SkipReason, find_position};
pub use crate::layout::radial::{RadialPoint, RadialPointCache};
pub use crate::layout::rotation::RotationPolicy;
pub use crate::layout::shape::{BuiltinShape, Shape, ShapeFn};
pub use crate::layout::size::{WeightExtent, weight_to_size};

pub use crate::cloud::settings::{
    ColorFn, ColorOption, ColorQuery, FontWeightFn, MIN_GRID_SIZE, Settings, WordCloudOptions,
    WordQuery,
};
pub use crate::cloud::word::{WordItem, WordList};
pub use crate::cloud::wordcloud::{DrawReport, PlacedWord, WordCloud, WordOutcome};

pub use crate::raster::block::BlockRasterizer;
pub use crate::raster::cpu::{CpuRasterizer, CpuSurface};
pub use crate::raster::fonts::FontResolver;
pub use crate::raster::recording::{RecordingSurface, SurfaceCall};
pub use crate::raster::{
    AlphaMask, Capabilities, FontSpec, FrameRGBA, GlyphRasterizer, Surface, TextJob,
    probe_support,
};
