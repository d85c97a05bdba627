use super::*;
use crate::cloud::settings::{ColorOption, WordCloudOptions};
use crate::foundation::clock::ManualClock;
use crate::raster::Capabilities;
use crate::raster::block::BlockRasterizer;
use crate::raster::recording::{RecordingSurface, SurfaceCall};

fn options() -> WordCloudOptions {
    WordCloudOptions {
        color: ColorOption::Single("#000".to_owned()),
        size_range: [10.0, 50.0],
        rotate_ratio: 0.0,
        shuffle: false,
        ..WordCloudOptions::default()
    }
}

fn cloud(opts: &WordCloudOptions, list: WordList) -> WordCloud<BlockRasterizer> {
    WordCloud::new(
        BlockRasterizer::new(),
        Settings::from_options(opts).unwrap(),
        list,
    )
    .with_rng(Rng64::new(1))
    .with_clock(ManualClock::new())
}

#[test]
fn missing_capabilities_make_the_cloud_inert() {
    let rasterizer = BlockRasterizer::new().with_capabilities(Capabilities {
        fill_text: false,
        ..Capabilities::full()
    });
    let mut wc = WordCloud::new(
        rasterizer,
        Settings::default(),
        WordList::from_pairs([("a", 1.0)]),
    );
    assert!(!wc.is_supported());

    let mut surface = RecordingSurface::new(100, 100);
    let report = wc.draw(&mut surface).unwrap();
    assert!(report.inert);
    assert!(report.outcomes.is_empty());
    assert!(surface.calls().is_empty());
}

#[test]
fn rasterizer_floor_is_detected_once() {
    let wc = WordCloud::new(
        BlockRasterizer::new().with_min_resolvable_px(9.0),
        Settings::default(),
        WordList::default(),
    );
    assert!(wc.is_supported());
    assert_eq!(wc.min_font_size(), 9.0);
}

#[test]
fn empty_list_only_clears_the_surface() {
    let mut wc = cloud(&options(), WordList::default());
    let mut surface = RecordingSurface::new(64, 64);
    let report = wc.draw(&mut surface).unwrap();
    assert!(report.outcomes.is_empty());
    assert!(!report.aborted);
    assert_eq!(surface.calls(), &[SurfaceCall::Clear(ColorDef::white())]);
}

#[test]
fn every_entry_gets_an_outcome_in_list_order() {
    let list = WordList::from_pairs([("alpha", 10.0), ("beta", 5.0), ("gamma", 1.0)]);
    let mut wc = cloud(&options(), list);
    let mut surface = RecordingSurface::new(300, 300);
    let report = wc.draw(&mut surface).unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.placement_order, vec![0, 1, 2]);
    let texts: Vec<_> = report.placed().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, ["alpha", "beta", "gamma"]);
    assert_eq!(surface.texts().count(), 3);
    assert_eq!(report.placed().next().map(|p| p.distance), Some(0));
}

#[test]
fn mask_paints_each_newly_occupied_cell() {
    let opts = WordCloudOptions {
        draw_mask: true,
        ..options()
    };
    let list = WordList::from_pairs([("mask", 3.0), ("me", 1.0)]);
    let mut wc = cloud(&opts, list);
    let mut surface = RecordingSurface::new(200, 200);
    let report = wc.draw(&mut surface).unwrap();

    let cells: usize = report.placed().map(|p| p.cells.len()).sum();
    assert!(cells > 0);
    assert_eq!(surface.rects().count(), cells);
    let (rect, color) = surface.rects().next().unwrap();
    assert!((rect.width() - (8.0 - 0.3)).abs() < 1e-9);
    assert_eq!(*color, ColorDef::rgba(1.0, 0.0, 0.0, 0.3));
}

#[test]
fn shrinking_never_touches_the_callers_list() {
    let opts = WordCloudOptions {
        shrink_to_fit: true,
        ..options()
    };
    let list = WordList::from_pairs([("enormous", 100.0), ("tiny", 1.0)]);
    let mut wc = cloud(&opts, list);
    let mut surface = RecordingSurface::new(80, 40);
    let report = wc.draw(&mut surface).unwrap();

    assert_eq!(wc.list().items()[0].weight, 100.0);
    let first = &report.outcomes[0];
    match first {
        WordOutcome::Placed(p) => {
            assert_eq!(p.weight, 100.0);
            assert!(p.effective_weight < 100.0);
        }
        WordOutcome::Skipped { weight, .. } => assert_eq!(*weight, 100.0),
    }
}

#[test]
fn update_list_takes_effect_on_the_next_draw() {
    let mut wc = cloud(&options(), WordList::from_pairs([("one", 1.0)]));
    let mut surface = RecordingSurface::new(200, 200);
    assert_eq!(wc.draw(&mut surface).unwrap().outcomes.len(), 1);

    wc.update_list(WordList::from_pairs([("two", 2.0), ("three", 3.0)]));
    let report = wc.draw(&mut surface).unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(surface.texts().count(), 2);
}

#[test]
fn report_serializes_with_status_tags() {
    let mut wc = cloud(&options(), WordList::from_pairs([("json", 1.0)]));
    let mut surface = RecordingSurface::new(100, 100);
    let report = wc.draw(&mut surface).unwrap();
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["outcomes"][0]["status"], "placed");
    assert_eq!(v["outcomes"][0]["text"], "json");
    let back: DrawReport = serde_json::from_value(v).unwrap();
    assert_eq!(back, report);
}
