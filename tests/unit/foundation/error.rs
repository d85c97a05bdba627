use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WordCloudError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WordCloudError::raster("x")
            .to_string()
            .contains("raster error:")
    );
    assert!(
        WordCloudError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        WordCloudError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WordCloudError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: WordCloudError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, WordCloudError::Serde(_)));
}
