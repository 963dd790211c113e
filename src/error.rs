//! Error types for levelplot.
//!
//! A single error enum covers level validation, query-time type errors,
//! pipeline shape checks and configuration problems.

use thiserror::Error;

/// The main error type for levelplot operations.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Level sequence is too short, not monotonic or not finite
    #[error("Invalid levels: {message}")]
    InvalidLevels { message: String },

    /// Unrecognized extend mode
    #[error("Invalid extend mode: {value:?}. Must be one of: neither, min, max, both")]
    InvalidExtend { value: String },

    /// Non-numeric input where numbers are required
    #[error("Type error: {message}")]
    Type { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Array shapes that do not line up
    #[error("Shape error: {message}")]
    Shape { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlotError {
    pub(crate) fn invalid_levels(message: impl Into<String>) -> Self {
        PlotError::InvalidLevels {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        PlotError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        PlotError::Shape {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
