use serde::{Deserialize, Serialize};

use crate::cloud::settings::{ColorQuery, Settings, WordQuery};
use crate::cloud::word::WordList;
use crate::foundation::clock::{Clock, SystemClock, TimeBudget};
use crate::foundation::color::ColorDef;
use crate::foundation::core::Rect;
use crate::foundation::error::WordCloudResult;
use crate::foundation::math::{RandomSource, Rng64};
use crate::layout::glyph::detect_min_font_size;
use crate::layout::grid::OccupancyGrid;
use crate::layout::placement::{Placement, PlacementParams, Placer, SkipReason};
use crate::layout::radial::RadialPointCache;
use crate::raster::{GlyphRasterizer, Surface, probe_support};

/// A drawn word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    /// Position in the word list.
    pub index: usize,
    /// Word text.
    pub text: String,
    /// Weight as given in the list.
    pub weight: f64,
    /// Weight actually drawn, after shrinking.
    pub effective_weight: f64,
    /// Font size drawn.
    pub font_size: f64,
    /// CSS font weight drawn.
    pub font_weight: String,
    /// Rotation in radians.
    pub rotation: f64,
    /// Top-left grid column of the glyph box.
    pub gx: i32,
    /// Top-left grid row of the glyph box.
    pub gy: i32,
    /// Glyph box width in cells.
    pub gw: i32,
    /// Glyph box height in cells.
    pub gh: i32,
    /// Newly occupied cells, absolute and clipped to the grid.
    pub cells: Vec<(i32, i32)>,
    /// Search radius at which the word was placed.
    pub distance: u32,
    /// Sample angle of the accepted point.
    pub theta: f64,
    /// Fill color.
    pub color: ColorDef,
}

/// What happened to one list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordOutcome {
    /// Drawn.
    Placed(PlacedWord),
    /// Not drawn.
    Skipped {
        /// Position in the word list.
        index: usize,
        /// Word text.
        text: String,
        /// Weight as given in the list.
        weight: f64,
        /// Why.
        reason: SkipReason,
    },
}

impl WordOutcome {
    /// The placement, if the word was drawn.
    pub fn placed(&self) -> Option<&PlacedWord> {
        match self {
            Self::Placed(p) => Some(p),
            Self::Skipped { .. } => None,
        }
    }

    /// The skip reason, if the word was not drawn.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Placed(_) => None,
            Self::Skipped { reason, .. } => Some(*reason),
        }
    }
}

/// Result of one draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawReport {
    /// One entry per list item, in list order.
    pub outcomes: Vec<WordOutcome>,
    /// List indices of drawn words, in draw order.
    pub placement_order: Vec<usize>,
    /// The time budget ran out and the rest of the list was not attempted.
    pub aborted: bool,
    /// The rasterizer lacks required capabilities; nothing was drawn.
    pub inert: bool,
}

impl DrawReport {
    /// Drawn words, in list order.
    pub fn placed(&self) -> impl Iterator<Item = &PlacedWord> {
        self.outcomes.iter().filter_map(WordOutcome::placed)
    }

    /// Number of drawn words.
    pub fn placed_count(&self) -> usize {
        self.placement_order.len()
    }
}

/// Lays out a word list onto a surface.
///
/// The rasterizer is probed once on construction. When it lacks a required capability the
/// instance is inert and every draw returns an empty report with [`DrawReport::inert`] set.
pub struct WordCloud<R: GlyphRasterizer> {
    rasterizer: R,
    settings: Settings,
    list: WordList,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
    supported: bool,
    min_font_size: f64,
    radial: RadialPointCache,
    on_abort: Option<Box<dyn FnMut()>>,
}

impl<R: GlyphRasterizer> WordCloud<R> {
    /// Probe `rasterizer` and bind it to `settings` and `list`.
    pub fn new(mut rasterizer: R, settings: Settings, list: impl Into<WordList>) -> Self {
        let mut supported = probe_support(&mut rasterizer);
        let mut min_font_size = 0.0;
        if supported {
            match detect_min_font_size(&mut rasterizer) {
                Ok(px) => min_font_size = px,
                Err(err) => {
                    tracing::warn!(error = %err, "minimum font size probe failed");
                    supported = false;
                }
            }
        }
        tracing::debug!(supported, min_font_size, "word cloud initialized");

        Self {
            rasterizer,
            settings,
            list: list.into(),
            clock: Box::new(SystemClock::new()),
            rng: Box::new(Rng64::from_time()),
            supported,
            min_font_size,
            radial: RadialPointCache::new(),
            on_abort: None,
        }
    }

    /// Use `clock` for the time budget.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use `rng` for rotation, shuffling and random colors.
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Call `f` when a draw runs out of time.
    pub fn on_abort(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_abort = Some(Box::new(f));
        self
    }

    /// Replace the list used by later draws.
    pub fn update_list(&mut self, list: impl Into<WordList>) {
        self.list = list.into();
    }

    /// Replace the settings used by later draws.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.radial = RadialPointCache::new();
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current word list.
    pub fn list(&self) -> &WordList {
        &self.list
    }

    /// Whether the rasterizer can drive a layout.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Rasterizer size floor detected on construction (`0` when there is none).
    pub fn min_font_size(&self) -> f64 {
        self.min_font_size
    }

    /// Clear `surface` and lay out the whole list from an empty grid.
    ///
    /// Errors only come from the surface; per-word failures are reported as outcomes.
    #[tracing::instrument(skip(self, surface), fields(words = self.list.len()))]
    pub fn draw(&mut self, surface: &mut dyn Surface) -> WordCloudResult<DrawReport> {
        if !self.supported {
            tracing::debug!("unsupported rasterizer, draw skipped");
            return Ok(DrawReport {
                inert: true,
                ..DrawReport::default()
            });
        }

        let Self {
            rasterizer,
            settings,
            list,
            clock,
            rng,
            radial,
            on_abort,
            min_font_size,
            ..
        } = self;

        let (width, height) = surface.size();
        let g = settings.grid_size;
        let gf = f64::from(g);
        let mut grid = OccupancyGrid::for_surface(width, height, g);
        let (ngx, ngy) = (grid.width(), grid.height());
        let center = match settings.origin {
            Some(p) => (p.x / gf, p.y / gf),
            None => (f64::from(ngx) / 2.0, f64::from(ngy) / 2.0),
        };
        let max_radius = (f64::from(ngx) * f64::from(ngx) + f64::from(ngy) * f64::from(ngy))
            .sqrt()
            .floor() as u32;
        tracing::debug!(ngx, ngy, ?center, max_radius, "draw started");

        surface.clear(settings.background_color)?;
        radial.prepare(center, &settings.shape, settings.ellipticity);

        let mut report = DrawReport::default();
        let Some(extent) = list.extent() else {
            return Ok(report);
        };
        let params = PlacementParams {
            font_family: settings.font_family.clone(),
            size_range: settings.size_range,
            extent,
            min_size: settings.min_size,
            min_font_size: *min_font_size,
            grid_size: g,
            max_radius,
            rotation: settings.rotation,
            shuffle: settings.shuffle,
            draw_out_of_bound: settings.draw_out_of_bound,
            shrink_to_fit: settings.shrink_to_fit,
        };

        let mut budget = TimeBudget::new(&**clock, settings.abort_threshold_ms);
        let items = list.items();
        for (index, item) in items.iter().enumerate() {
            budget.start_word();
            let font_weight = |weight: f64, font_size: f64| {
                (settings.font_weight)(&WordQuery {
                    word: &item.text,
                    weight,
                    font_size,
                    extra: &item.extra,
                })
            };
            let placement = Placer {
                rasterizer: &mut *rasterizer,
                grid: &grid,
                radial: &mut *radial,
                rng: &mut **rng,
                budget: &budget,
                params: &params,
            }
            .place(&item.text, item.weight, &font_weight);

            match placement {
                Placement::Placed(found) => {
                    let found = *found;
                    let at = found.at;
                    let color = (settings.color)(
                        &ColorQuery {
                            word: &item.text,
                            weight: found.weight,
                            font_size: found.info.font_size,
                            distance: f64::from(at.radius),
                            theta: at.theta,
                            extra: &item.extra,
                        },
                        &mut **rng,
                    );
                    surface.fill_text(&found.info.draw_job(&item.text, at.gx, at.gy, g), color)?;

                    let cells = grid.mark(at.gx, at.gy, &found.info.occupied);
                    if settings.draw_mask {
                        let side = gf - settings.mask_gap_width;
                        for &(x, y) in &cells {
                            let (x0, y0) = (f64::from(x) * gf, f64::from(y) * gf);
                            surface.fill_rect(
                                Rect::new(x0, y0, x0 + side, y0 + side),
                                settings.mask_color,
                            )?;
                        }
                    }
                    tracing::trace!(
                        word = %item.text,
                        gx = at.gx,
                        gy = at.gy,
                        radius = at.radius,
                        "placed"
                    );

                    report.placement_order.push(index);
                    report.outcomes.push(WordOutcome::Placed(PlacedWord {
                        index,
                        text: item.text.clone(),
                        weight: item.weight,
                        effective_weight: found.weight,
                        font_size: found.info.font_size,
                        font_weight: found.font_weight,
                        rotation: found.info.rotation,
                        gx: at.gx,
                        gy: at.gy,
                        gw: found.info.gw,
                        gh: found.info.gh,
                        cells,
                        distance: at.radius,
                        theta: at.theta,
                        color,
                    }));
                }
                Placement::Skipped(reason) => {
                    tracing::trace!(word = %item.text, ?reason, "skipped");
                    report.outcomes.push(WordOutcome::Skipped {
                        index,
                        text: item.text.clone(),
                        weight: item.weight,
                        reason,
                    });
                }
            }

            if budget.exceeded() {
                tracing::warn!(
                    placed = report.placement_order.len(),
                    remaining = items.len() - index - 1,
                    "time budget exceeded, draw aborted"
                );
                report.aborted = true;
                for (rest, item) in items.iter().enumerate().skip(index + 1) {
                    report.outcomes.push(WordOutcome::Skipped {
                        index: rest,
                        text: item.text.clone(),
                        weight: item.weight,
                        reason: SkipReason::NotReached,
                    });
                }
                if let Some(cb) = on_abort.as_mut() {
                    cb();
                }
                break;
            }
        }

        tracing::debug!(
            placed = report.placement_order.len(),
            total = items.len(),
            "draw finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cloud/wordcloud.rs"]
mod tests;
