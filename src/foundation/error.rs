/// Convenience result type used across Lyrica.
pub type LyricaResult<T> = Result<T, LyricaError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LyricaError {
    /// The lyric timeline cannot produce defined geometry.
    #[error("invalid timeline: {0}")]
    InvalidTimeline(String),

    /// Theme or engine configuration is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Invalid user-provided input that is neither timeline nor config.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames to a sink or encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LyricaError {
    /// Build a [`LyricaError::InvalidTimeline`] value.
    pub fn invalid_timeline(msg: impl Into<String>) -> Self {
        Self::InvalidTimeline(msg.into())
    }

    /// Build a [`LyricaError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`LyricaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LyricaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LyricaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LyricaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
