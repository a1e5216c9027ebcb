//! Error types for the canvas helpers

use thiserror::Error;

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading images or touching a surface
#[derive(Error, Debug)]
pub enum Error {
    /// The source locator is empty, unsupported, or malformed
    #[error("Invalid image source: {0}")]
    InvalidSource(String),

    /// Failed to fetch the image bytes (network, filesystem, HTTP status)
    #[error("Failed to load image: {0}")]
    LoadError(String),

    /// The fetched bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Failed to read, write, or encode pixels
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::LoadError(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::DecodeError(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::LoadError(err.to_string())
    }
}
