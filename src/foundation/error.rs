/// Result alias used across the crate.
pub type WordCloudResult<T> = Result<T, WordCloudError>;

/// Crate error type.
///
/// Placement outcomes (a word too small to draw, a word that does not fit, a timed-out word)
/// are not errors; they are reported through [`crate::DrawReport`].
#[derive(thiserror::Error, Debug)]
pub enum WordCloudError {
    /// Malformed options or inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// The glyph rasterizer could not measure or render text.
    #[error("raster error: {0}")]
    Raster(String),

    /// The target surface rejected a drawing operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WordCloudError {
    /// Build a [`WordCloudError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WordCloudError::Raster`].
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`WordCloudError::Surface`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`WordCloudError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WordCloudError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
