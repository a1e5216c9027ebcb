//! RFox Canvas
//!
//! Headless 2D canvas helpers for Rust: load an image asynchronously and draw
//! it onto an RGBA surface, or fill a surface with random per-pixel noise.
//!
//! # Features
//!
//! - **HTTP loading** (default, `http` feature): fetch images over HTTP(S)
//! - **Data URLs and files**: `data:image/png;base64,...`, `file://` URLs and
//!   plain paths are always supported
//! - **Surface trait**: the drawing helpers work against any [`Surface`];
//!   [`Canvas`] is the in-memory implementation
//!
//! # Example
//!
//! ```no_run
//! use rfcanvas::{Canvas, ImageLoader, LoaderConfig};
//!
//! # async fn run() -> rfcanvas::Result<()> {
//! let loader = ImageLoader::new(LoaderConfig::default())?;
//! let mut canvas = Canvas::new(320, 240)?;
//!
//! rfcanvas::draw_noise_to_canvas(&mut canvas, false)?;
//! rfcanvas::draw_image_to_canvas(&mut canvas, "logo.png", &loader).await?;
//! canvas.save_png("out.png")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

pub mod bitmap;
pub mod draw;
pub mod loader;
pub mod noise;
pub mod surface;

// Async facade over a worker-owned canvas
pub mod async_api;

pub use async_api::CanvasWorker;
pub use bitmap::Bitmap;
pub use draw::{draw_image_at, draw_image_to_canvas, draw_images_to_canvas, Placement};
pub use loader::{HtmlImage, ImageLoader, ImageSource, ImageState};
pub use noise::{draw_noise_region, draw_noise_to_canvas, fill_noise, NoiseMode};
pub use surface::{Canvas, ImageData, Region, Surface};

/// Largest canvas area (in pixels) accepted by [`CanvasConfig::validate`].
pub const MAX_CANVAS_PIXELS: u64 = 16384 * 16384;

/// Configuration for an in-memory canvas
///
/// The defaults match the size of a fresh HTML `<canvas>` element (300x150).
///
/// # Examples
///
/// ```
/// let cfg = rfcanvas::CanvasConfig::default();
/// assert_eq!((cfg.width, cfg.height), (300, 150));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Settings used when fetching images for this canvas
    pub loader: LoaderConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            loader: LoaderConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the canvas area is representable. Zero-sized canvases are valid.
    pub fn validate(&self) -> Result<()> {
        check_canvas_size(self.width, self.height)
    }
}

/// Reject canvases larger than [`MAX_CANVAS_PIXELS`].
pub fn check_canvas_size(width: u32, height: u32) -> Result<()> {
    let area = width as u64 * height as u64;
    if area > MAX_CANVAS_PIXELS {
        return Err(Error::ConfigError(format!(
            "canvas {}x{} exceeds {} pixels",
            width, height, MAX_CANVAS_PIXELS
        )));
    }
    Ok(())
}

/// Settings for [`ImageLoader`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// User agent sent with HTTP requests
    pub user_agent: String,
    /// Load timeout in milliseconds; `0` waits forever
    pub timeout_ms: u64,
    /// Largest accepted encoded image size in bytes
    pub max_bytes: u64,
    /// Widest accepted decoded image, in pixels
    pub max_width: u32,
    /// Tallest accepted decoded image, in pixels
    pub max_height: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("rfcanvas/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
            max_bytes: 15 * 1024 * 1024,
            max_width: 16384,
            max_height: 16384,
        }
    }
}
