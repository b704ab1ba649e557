//! Error types for palette extraction and color replacement.

use thiserror::Error;

/// Result type alias for palette_swap operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Hex text is not exactly six hex digits (after an optional `#`)
    #[error("Malformed color {input:?}: {reason}")]
    MalformedColor { input: String, reason: &'static str },

    /// Pixel buffer has a zero dimension or its pixel count does not match
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// Out-of-range tolerance, max_colors, etc.
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: String },

    #[error("Reference palette is empty")]
    EmptyPalette,

    #[error("Color mapping is empty")]
    EmptyMapping,

    /// Color map JSON was not an object of hex strings
    #[error("Malformed color map: {reason}")]
    MalformedMapping {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

impl Error {
    pub(crate) fn malformed_color(input: &str, reason: &'static str) -> Self {
        Error::MalformedColor {
            input: input.to_string(),
            reason,
        }
    }

    pub(crate) fn invalid_parameter(parameter: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        Error::InvalidImage {
            reason: reason.into(),
        }
    }
}
