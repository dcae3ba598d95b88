//! Error type shared by icon construction, configuration and resource lookup.
//!
//! Rendering itself never fails: every render operation assumes validated
//! input. Errors surface only where data enters the crate.

use resvg::usvg;

/// Errors produced while building icons, loading configuration or resolving
/// legacy icon resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image codec error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to read configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("icon resource {package}/{resource} not found")]
    ResourceNotFound { package: String, resource: String },

    #[cfg(feature = "twemoji")]
    #[error("emoji {0:?} has no twemoji asset")]
    EmojiNotFound(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
