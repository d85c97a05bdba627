use super::*;

#[test]
fn generic_names_map_to_fontdb_generics() {
    assert!(matches!(family_of("sans-serif"), fontdb::Family::SansSerif));
    assert!(matches!(family_of("Serif"), fontdb::Family::Serif));
    assert!(matches!(family_of("monospace"), fontdb::Family::Monospace));
    assert!(matches!(family_of("Arial"), fontdb::Family::Name("Arial")));
}

#[test]
fn empty_database_resolves_nothing() {
    let mut fonts = FontResolver::empty();
    assert_eq!(fonts.face_count(), 0);
    assert!(fonts.resolve(&FontSpec::new("sans-serif", "normal", 10.0)).is_none());
}

#[test]
fn missing_font_file_is_an_error() {
    let mut fonts = FontResolver::empty();
    let err = fonts
        .load_font_file("/definitely/not/here.ttf")
        .unwrap_err();
    assert!(err.to_string().contains("not/here.ttf"));
}

#[test]
fn system_fonts_shape_when_available() {
    let mut fonts = FontResolver::system();
    let Some(face) = fonts.resolve(&FontSpec::new("sans-serif", "normal", 20.0)) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let Ok(short) = engine.shape_line("m", &face, 400, 20.0) else {
        return;
    };
    let long = engine.shape_line("mmmm", &face, 400, 20.0).unwrap();
    assert!(short.width > 0.0);
    assert!(long.width > short.width * 3.5);
    assert_eq!(long.glyphs.len(), 4);
    assert!(engine.shape_line("m", &face, 400, 0.0).is_err());
}
