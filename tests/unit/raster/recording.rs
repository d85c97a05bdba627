use super::*;

#[test]
fn clear_discards_earlier_calls() {
    let mut s = RecordingSurface::new(10, 10);
    s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorDef::black())
        .unwrap();
    s.clear(ColorDef::white()).unwrap();
    assert_eq!(s.calls(), &[SurfaceCall::Clear(ColorDef::white())]);
    assert_eq!(s.size(), (10, 10));
}

#[test]
fn records_text_and_rects_in_order() {
    let mut s = RecordingSurface::new(10, 10);
    let font = FontSpec::new("serif", "normal", 12.0);
    let job = TextJob {
        text: "hi",
        font: &font,
        transform: Affine::translate((3.0, 4.0)),
        anchor: Point::new(-1.0, 0.0),
    };
    s.fill_text(&job, ColorDef::black()).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), ColorDef::white())
        .unwrap();

    assert_eq!(s.texts().count(), 1);
    assert_eq!(s.rects().count(), 1);
    match &s.calls()[0] {
        SurfaceCall::Text { text, anchor, .. } => {
            assert_eq!(text, "hi");
            assert_eq!(*anchor, Point::new(-1.0, 0.0));
        }
        other => panic!("unexpected call {other:?}"),
    }
}
