use super::*;

#[test]
fn font_spec_parses_family_lists_and_weights() {
    let f = FontSpec::new("\"Trebuchet MS\", 'Heiti TC', sans-serif", "bold", 12.0);
    assert_eq!(f.families(), vec!["Trebuchet MS", "Heiti TC", "sans-serif"]);
    assert_eq!(f.numeric_weight(), 700);
    assert_eq!(FontSpec::new("a", "normal", 1.0).numeric_weight(), 400);
    assert_eq!(FontSpec::new("a", "600", 1.0).numeric_weight(), 600);
    assert_eq!(FontSpec::new("a", "heavy-ish", 1.0).numeric_weight(), 400);
}

#[test]
fn alpha_mask_reads_alpha_channel() {
    let rgba = [1, 2, 3, 0, 9, 9, 9, 200];
    let m = AlphaMask::from_rgba8(2, 1, &rgba).unwrap();
    assert_eq!(m.alpha(0, 0), 0);
    assert_eq!(m.alpha(1, 0), 200);
    assert_eq!(m.alpha(5, 5), 0);

    let err = AlphaMask::from_rgba8(2, 2, &rgba).unwrap_err();
    assert!(err.to_string().starts_with("raster error:"));
}

#[test]
fn probe_requires_every_capability() {
    let mut full = block::BlockRasterizer::new();
    assert!(probe_support(&mut full));

    let mut blind = block::BlockRasterizer::new().with_capabilities(Capabilities {
        read_pixels: false,
        ..Capabilities::full()
    });
    assert!(!probe_support(&mut blind));
}

#[test]
fn probe_rejects_failing_measurement() {
    struct Broken;
    impl GlyphRasterizer for Broken {
        fn measure_text(&mut self, _: &str, _: &FontSpec) -> WordCloudResult<f64> {
            Err(WordCloudError::raster("no fonts"))
        }
        fn rasterize_alpha(&mut self, w: u32, h: u32, _: &TextJob<'_>) -> WordCloudResult<AlphaMask> {
            Ok(AlphaMask::new(w, h))
        }
    }
    assert!(!probe_support(&mut Broken));
}

#[test]
fn frame_unpremultiplies_for_png() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let straight = frame.to_straight_rgba8();
    assert_eq!(straight[3], 128);
    assert!((i32::from(straight[0]) - 128).abs() <= 1);
}
