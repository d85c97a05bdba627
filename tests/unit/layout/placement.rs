use super::*;
use crate::foundation::clock::{Clock, ManualClock};
use crate::foundation::error::{WordCloudError, WordCloudResult};
use crate::foundation::math::Rng64;
use crate::layout::shape::Shape;
use crate::raster::block::BlockRasterizer;
use crate::raster::{AlphaMask, FontSpec, TextJob};

fn params(ngx: u32, ngy: u32) -> PlacementParams {
    PlacementParams {
        font_family: "sans-serif".to_owned(),
        size_range: [10.0, 50.0],
        extent: WeightExtent {
            min: 1.0,
            max: 100.0,
        },
        min_size: 0.0,
        min_font_size: 0.0,
        grid_size: 8,
        max_radius: f64::from(ngx * ngx + ngy * ngy).sqrt().floor() as u32,
        rotation: RotationPolicy::none(),
        shuffle: false,
        draw_out_of_bound: false,
        shrink_to_fit: false,
    }
}

fn radial_for(grid: &OccupancyGrid) -> RadialPointCache {
    let mut radial = RadialPointCache::new();
    radial.prepare(
        (f64::from(grid.width()) / 2.0, f64::from(grid.height()) / 2.0),
        &Shape::default(),
        0.85,
    );
    radial
}

fn normal(_: f64, _: f64) -> String {
    "normal".to_owned()
}

fn run(
    rasterizer: &mut dyn GlyphRasterizer,
    grid: &OccupancyGrid,
    params: &PlacementParams,
    clock: &dyn Clock,
    threshold_ms: u64,
    text: &str,
    weight: f64,
) -> Placement {
    let mut radial = radial_for(grid);
    let mut rng = Rng64::new(1);
    let budget = TimeBudget::new(clock, threshold_ms);
    let mut placer = Placer {
        rasterizer,
        grid,
        radial: &mut radial,
        rng: &mut rng,
        budget: &budget,
        params,
    };
    placer.place(text, weight, &normal)
}

#[test]
fn empty_grid_places_at_the_center() {
    let grid = OccupancyGrid::new(20, 20);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let Placement::Placed(found) = run(&mut r, &grid, &params(20, 20), &clock, 0, "ab", 1.0)
    else {
        panic!("expected a placement");
    };
    assert_eq!(found.at.radius, 0);
    assert_eq!(found.info.font_size, 10.0);
    assert_eq!(found.weight, 1.0);
    assert_eq!(found.font_weight, "normal");
}

#[test]
fn sizes_at_the_minimum_are_skipped() {
    let grid = OccupancyGrid::new(20, 20);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let mut p = params(20, 20);
    p.min_size = 10.0;
    let out = run(&mut r, &grid, &p, &clock, 0, "ab", 1.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::BelowMinSize)));
}

#[test]
fn oversized_words_are_rejected_before_searching() {
    let grid = OccupancyGrid::new(4, 4);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let out = run(&mut r, &grid, &params(4, 4), &clock, 0, "WWWWWWWW", 100.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::TooLarge)));
}

#[test]
fn out_of_bound_drawing_accepts_oversized_words() {
    let grid = OccupancyGrid::new(4, 4);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let mut p = params(4, 4);
    p.draw_out_of_bound = true;
    let out = run(&mut r, &grid, &p, &clock, 0, "WWWWWWWW", 100.0);
    assert!(matches!(out, Placement::Placed(_)));
}

#[test]
fn full_grid_leaves_no_room() {
    let mut grid = OccupancyGrid::new(10, 10);
    let all: Vec<(i32, i32)> = (0..10).flat_map(|x| (0..10).map(move |y| (x, y))).collect();
    grid.mark(0, 0, &all);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let out = run(&mut r, &grid, &params(10, 10), &clock, 0, "ab", 50.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::NoRoom)));
}

#[test]
fn shrinking_stops_when_sizes_stop_moving() {
    let mut grid = OccupancyGrid::new(10, 10);
    let all: Vec<(i32, i32)> = (0..10).flat_map(|x| (0..10).map(move |y| (x, y))).collect();
    grid.mark(0, 0, &all);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let mut p = params(10, 10);
    p.shrink_to_fit = true;
    let out = run(&mut r, &grid, &p, &clock, 0, "ab", 50.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::NoRoom)));
}

#[test]
fn shrink_to_fit_reduces_weight_until_it_fits() {
    let grid = OccupancyGrid::new(10, 5);
    let clock = ManualClock::new();
    let mut r = BlockRasterizer::new();
    let mut p = params(10, 5);
    p.shrink_to_fit = true;
    let Placement::Placed(found) = run(&mut r, &grid, &p, &clock, 0, "ab", 100.0) else {
        panic!("expected the word to fit after shrinking");
    };
    assert!(found.weight < 100.0);
    assert!(found.info.font_size < 50.0);
    let cells: Vec<_> = found
        .info
        .occupied
        .iter()
        .map(|&(x, y)| (found.at.gx + x, found.at.gy + y))
        .collect();
    assert!(cells.iter().all(|&(x, y)| grid.contains(x, y)));
}

struct SlowRasterizer {
    inner: BlockRasterizer,
    clock: ManualClock,
}

impl GlyphRasterizer for SlowRasterizer {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WordCloudResult<f64> {
        self.inner.measure_text(text, font)
    }

    fn rasterize_alpha(&mut self, w: u32, h: u32, job: &TextJob<'_>) -> WordCloudResult<AlphaMask> {
        self.clock.advance(5);
        self.inner.rasterize_alpha(w, h, job)
    }
}

#[test]
fn slow_rasterization_times_out() {
    let grid = OccupancyGrid::new(20, 20);
    let clock = ManualClock::new();
    let mut r = SlowRasterizer {
        inner: BlockRasterizer::new(),
        clock: clock.clone(),
    };
    let out = run(&mut r, &grid, &params(20, 20), &clock, 1, "ab", 10.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::TimedOut)));
}

struct FailingRasterizer;

impl GlyphRasterizer for FailingRasterizer {
    fn measure_text(&mut self, _: &str, _: &FontSpec) -> WordCloudResult<f64> {
        Err(WordCloudError::raster("no font"))
    }

    fn rasterize_alpha(&mut self, w: u32, h: u32, _: &TextJob<'_>) -> WordCloudResult<AlphaMask> {
        Ok(AlphaMask::new(w, h))
    }
}

#[test]
fn raster_failures_skip_the_word() {
    let grid = OccupancyGrid::new(20, 20);
    let clock = ManualClock::new();
    let out = run(&mut FailingRasterizer, &grid, &params(20, 20), &clock, 0, "ab", 10.0);
    assert!(matches!(out, Placement::Skipped(SkipReason::RasterFailed)));
}

#[test]
fn shuffled_search_is_reproducible_per_seed() {
    let mut grid = OccupancyGrid::new(20, 20);
    grid.mark(8, 8, &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    let mut r = BlockRasterizer::new();
    let req = GlyphRequest {
        text: "ab",
        font_family: "sans-serif",
        font_weight: "normal",
        font_size: 12.0,
        rotation: 0.0,
    };
    let info = glyph::acquire(&mut r, &req, 8, 0.0).unwrap();

    let pick = |seed| {
        let mut radial = radial_for(&grid);
        let mut rng = Rng64::new(seed);
        find_position(&grid, &mut radial, &info, 28, false, true, &mut rng)
    };
    let a = pick(9).unwrap();
    let b = pick(9).unwrap();
    assert_eq!(a, b);
    assert!(a.radius > 0);
}
