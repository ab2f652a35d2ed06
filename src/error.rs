//! Error types for the riskmap library.
//!
//! This module defines the error enum shared by every plotting, projection
//! and rendering operation.

use thiserror::Error;

/// The main error type for riskmap operations.
#[derive(Error, Debug)]
pub enum RiskmapError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Coordinates and values disagree in size
    #[error("Size mismatch in input array: {expected} != {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Coordinate reference system that cannot be interpreted
    #[error("Unsupported coordinate reference system: {crs}")]
    UnsupportedCrs { crs: String },

    /// Projection errors
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Shapefile reading errors
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RiskmapError {
    /// Shorthand for an [`RiskmapError::InvalidParameter`].
    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        RiskmapError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with RiskmapError
pub type Result<T> = std::result::Result<T, RiskmapError>;
