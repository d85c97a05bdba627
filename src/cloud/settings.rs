use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::color::ColorDef;
use crate::foundation::core::Point;
use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::foundation::math::RandomSource;
use crate::layout::rotation::RotationPolicy;
use crate::layout::shape::Shape;

/// Smallest accepted grid cell, in pixels.
pub const MIN_GRID_SIZE: u32 = 4;

/// Inputs of the font-weight callable.
#[derive(Clone, Copy, Debug)]
pub struct WordQuery<'a> {
    /// Word text.
    pub word: &'a str,
    /// Current (possibly shrunk) weight.
    pub weight: f64,
    /// Mapped font size.
    pub font_size: f64,
    /// Extra data of the item.
    pub extra: &'a [Value],
}

/// Inputs of the color callable.
#[derive(Clone, Copy, Debug)]
pub struct ColorQuery<'a> {
    /// Word text.
    pub word: &'a str,
    /// Current (possibly shrunk) weight.
    pub weight: f64,
    /// Mapped font size.
    pub font_size: f64,
    /// Radius at which the word was placed.
    pub distance: f64,
    /// Sample angle of the accepted point.
    pub theta: f64,
    /// Extra data of the item.
    pub extra: &'a [Value],
}

/// Resolved color policy.
pub type ColorFn = Arc<dyn Fn(&ColorQuery<'_>, &mut dyn RandomSource) -> ColorDef + Send + Sync>;

/// Resolved font-weight policy.
pub type FontWeightFn = Arc<dyn Fn(&WordQuery<'_>) -> String + Send + Sync>;

/// Color option as written in JSON: one color or named policy, or a palette to draw from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorOption {
    /// CSS color, or `random-dark` / `random-light`.
    Single(String),
    /// Colors picked uniformly at random per word.
    Palette(Vec<String>),
}

impl ColorOption {
    /// Resolve into a callable.
    pub fn resolve(&self) -> WordCloudResult<ColorFn> {
        match self {
            Self::Single(name) => match name.trim() {
                "random-dark" => Ok(random_hsl_policy(10.0, 50.0)),
                "random-light" => Ok(random_hsl_policy(50.0, 90.0)),
                css => {
                    let c = ColorDef::parse(css)
                        .map_err(|e| WordCloudError::validation(format!("color: {e}")))?;
                    Ok(Arc::new(move |_: &ColorQuery<'_>, _: &mut dyn RandomSource| c))
                }
            },
            Self::Palette(colors) => {
                if colors.is_empty() {
                    return Err(WordCloudError::validation("color palette must not be empty"));
                }
                let palette = colors
                    .iter()
                    .map(|c| ColorDef::parse(c))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| WordCloudError::validation(format!("color palette: {e}")))?;
                Ok(Arc::new(
                    move |_: &ColorQuery<'_>, rng: &mut dyn RandomSource| {
                        let i = (rng.next_f64() * palette.len() as f64).floor() as usize;
                        palette[i.min(palette.len() - 1)]
                    },
                ))
            }
        }
    }
}

fn random_hsl_policy(min_l: f64, max_l: f64) -> ColorFn {
    Arc::new(move |_: &ColorQuery<'_>, rng: &mut dyn RandomSource| {
        ColorDef::random_hsl(min_l, max_l, rng)
    })
}

/// JSON-facing options. Missing keys take the defaults below.
///
/// Keys are snake_case; the camelCase spellings (`sizeRange`, `gridSize`, ...) are accepted as
/// aliases. Unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordCloudOptions {
    /// CSS family list.
    #[serde(alias = "fontFamily")]
    pub font_family: String,
    /// CSS font weight.
    #[serde(alias = "fontWeight")]
    pub font_weight: String,
    /// Text color or color policy.
    pub color: ColorOption,
    /// Words mapping to this size or smaller are not drawn.
    #[serde(alias = "minSize")]
    pub min_size: f64,
    /// `[min, max]` font size in pixels.
    #[serde(alias = "sizeRange")]
    pub size_range: [f64; 2],
    /// Surface background.
    #[serde(alias = "backgroundColor")]
    pub background_color: ColorDef,
    /// Cell size in pixels, floored and clamped to at least 4.
    #[serde(alias = "gridSize")]
    pub grid_size: f64,
    /// Accept placements that leave the surface.
    #[serde(alias = "drawOutOfBound")]
    pub draw_out_of_bound: bool,
    /// Shrink words that do not fit instead of dropping them.
    #[serde(alias = "shrinkToFit")]
    pub shrink_to_fit: bool,
    /// Search center in surface pixels; the surface center when absent.
    pub origin: Option<[f64; 2]>,
    /// Paint occupied cells after every placement.
    #[serde(alias = "drawMask")]
    pub draw_mask: bool,
    /// Occupied-cell paint.
    #[serde(alias = "maskColor")]
    pub mask_color: ColorDef,
    /// Gap left between painted cells.
    #[serde(alias = "maskGapWidth")]
    pub mask_gap_width: f64,
    /// Per-word time budget in milliseconds; `0` disables it.
    #[serde(alias = "abortThreshold")]
    pub abort_threshold: u64,
    /// Rotation range in degrees.
    #[serde(alias = "rotationRange")]
    pub rotation_range: [f64; 2],
    /// Number of discrete angles in the range; `0` samples continuously.
    #[serde(alias = "rotationSteps")]
    pub rotation_steps: f64,
    /// Randomize candidate order within a radius.
    pub shuffle: bool,
    /// Probability that a word is rotated.
    #[serde(alias = "rotateRatio")]
    pub rotate_ratio: f64,
    /// Search silhouette name.
    pub shape: String,
    /// Vertical compression of the search.
    pub ellipticity: f64,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            font_family: "\"Trebuchet MS\", \"Heiti TC\", \"微軟正黑體\", \"Arial Unicode MS\", \"Droid Fallback Sans\", sans-serif".to_owned(),
            font_weight: "normal".to_owned(),
            color: ColorOption::Single("random-dark".to_owned()),
            min_size: 0.0,
            size_range: [16.0, 68.0],
            background_color: ColorDef::white(),
            grid_size: 8.0,
            draw_out_of_bound: false,
            shrink_to_fit: false,
            origin: None,
            draw_mask: false,
            mask_color: ColorDef::rgba(1.0, 0.0, 0.0, 0.3),
            mask_gap_width: 0.3,
            abort_threshold: 0,
            rotation_range: [-70.0, 70.0],
            rotation_steps: 14.0,
            shuffle: true,
            rotate_ratio: 0.1,
            shape: "circle".to_owned(),
            ellipticity: 0.85,
        }
    }
}

impl WordCloudOptions {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> WordCloudResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| WordCloudError::validation(format!("parse options JSON: {e}")))
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> WordCloudResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> WordCloudResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WordCloudError::validation(format!("open options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// Resolved configuration snapshot used by one draw.
#[derive(Clone)]
pub struct Settings {
    /// CSS family list.
    pub font_family: String,
    /// Font weight per word.
    pub font_weight: FontWeightFn,
    /// Color per placed word.
    pub color: ColorFn,
    /// Words mapping to this size or smaller are not drawn.
    pub min_size: f64,
    /// `[min, max]` font size in pixels.
    pub size_range: [f64; 2],
    /// Surface background.
    pub background_color: ColorDef,
    /// Cell size in pixels (at least [`MIN_GRID_SIZE`]).
    pub grid_size: u32,
    /// Accept placements that leave the surface.
    pub draw_out_of_bound: bool,
    /// Shrink words that do not fit.
    pub shrink_to_fit: bool,
    /// Search center in surface pixels.
    pub origin: Option<Point>,
    /// Paint occupied cells.
    pub draw_mask: bool,
    /// Occupied-cell paint.
    pub mask_color: ColorDef,
    /// Gap between painted cells.
    pub mask_gap_width: f64,
    /// Per-word time budget in milliseconds; `0` disables it.
    pub abort_threshold_ms: u64,
    /// Rotation sampling, in radians.
    pub rotation: RotationPolicy,
    /// Randomize candidate order within a radius.
    pub shuffle: bool,
    /// Search silhouette.
    pub shape: Shape,
    /// Vertical compression of the search.
    pub ellipticity: f64,
}

impl Settings {
    /// Validate and resolve `opts`.
    pub fn from_options(opts: &WordCloudOptions) -> WordCloudResult<Self> {
        let finite = |name: &str, v: f64| -> WordCloudResult<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(WordCloudError::validation(format!("{name} must be finite")))
            }
        };
        finite("size_range[0]", opts.size_range[0])?;
        finite("size_range[1]", opts.size_range[1])?;
        finite("min_size", opts.min_size)?;
        finite("grid_size", opts.grid_size)?;
        finite("mask_gap_width", opts.mask_gap_width)?;
        finite("rotation_range[0]", opts.rotation_range[0])?;
        finite("rotation_range[1]", opts.rotation_range[1])?;
        finite("rotation_steps", opts.rotation_steps)?;
        finite("rotate_ratio", opts.rotate_ratio)?;
        finite("ellipticity", opts.ellipticity)?;
        if let Some([x, y]) = opts.origin {
            finite("origin[0]", x)?;
            finite("origin[1]", y)?;
        }

        let color = opts.color.resolve()?;
        Ok(Self::build(opts, color))
    }

    fn build(opts: &WordCloudOptions, color: ColorFn) -> Self {
        let weight = opts.font_weight.clone();
        let grid_size = opts.grid_size.floor().max(f64::from(MIN_GRID_SIZE)) as u32;
        let [a, b] = opts.rotation_range;
        let steps = opts.rotation_steps.floor().abs() as u32;

        Self {
            font_family: opts.font_family.clone(),
            font_weight: Arc::new(move |_: &WordQuery<'_>| weight.clone()),
            color,
            min_size: opts.min_size,
            size_range: opts.size_range,
            background_color: opts.background_color,
            grid_size,
            draw_out_of_bound: opts.draw_out_of_bound,
            shrink_to_fit: opts.shrink_to_fit,
            origin: opts.origin.map(|[x, y]| Point::new(x, y)),
            draw_mask: opts.draw_mask,
            mask_color: opts.mask_color,
            mask_gap_width: opts.mask_gap_width,
            abort_threshold_ms: opts.abort_threshold,
            rotation: RotationPolicy::new(opts.rotate_ratio, a.to_radians(), b.to_radians(), steps),
            shuffle: opts.shuffle,
            shape: Shape::from_name(&opts.shape),
            ellipticity: opts.ellipticity,
        }
    }

    /// Replace the color policy.
    pub fn with_color_fn(
        mut self,
        f: impl Fn(&ColorQuery<'_>, &mut dyn RandomSource) -> ColorDef + Send + Sync + 'static,
    ) -> Self {
        self.color = Arc::new(f);
        self
    }

    /// Replace the font-weight policy.
    pub fn with_font_weight_fn(
        mut self,
        f: impl Fn(&WordQuery<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.font_weight = Arc::new(f);
        self
    }

    /// Use a custom polar shape `theta -> radius multiplier`.
    pub fn with_shape_fn(mut self, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.shape = Shape::custom(f);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::build(&WordCloudOptions::default(), random_hsl_policy(10.0, 50.0))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("font_family", &self.font_family)
            .field("min_size", &self.min_size)
            .field("size_range", &self.size_range)
            .field("background_color", &self.background_color)
            .field("grid_size", &self.grid_size)
            .field("draw_out_of_bound", &self.draw_out_of_bound)
            .field("shrink_to_fit", &self.shrink_to_fit)
            .field("origin", &self.origin)
            .field("draw_mask", &self.draw_mask)
            .field("abort_threshold_ms", &self.abort_threshold_ms)
            .field("rotation", &self.rotation)
            .field("shuffle", &self.shuffle)
            .field("shape", &self.shape)
            .field("ellipticity", &self.ellipticity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/settings.rs"]
mod tests;
