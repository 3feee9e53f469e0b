/// Convenience result type used across inkpanel.
pub type InkResult<T> = Result<T, InkError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum InkError {
    /// Invalid user-provided page, bubble or drawing data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing surfaces.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while decoding or encoding raster images.
    #[error("image error: {0}")]
    Image(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkError {
    /// Build an [`InkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`InkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`InkError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build an [`InkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
