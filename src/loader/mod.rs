//! Image loading: fetch bytes for a locator, decode them, track load state.
//!
//! [`ImageLoader::load`] is the load primitive: its `Ok` is the load event,
//! its `Err` the error event. A fetch that never produces either (for
//! example an HTTP server that accepts the connection and never answers)
//! keeps the future pending unless `LoaderConfig::timeout_ms` is set.

pub mod source;

pub use source::ImageSource;

use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, warn};

use crate::bitmap::Bitmap;
use crate::{Error, LoaderConfig, Result};

/// Fetches and decodes images for the drawing helpers.
pub struct ImageLoader {
    config: LoaderConfig,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl ImageLoader {
    pub fn new(config: LoaderConfig) -> Result<Self> {
        #[cfg(feature = "http")]
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            #[cfg(feature = "http")]
            client,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load and decode the image named by `src`.
    pub async fn load(&self, src: &str) -> Result<Bitmap> {
        let source = ImageSource::parse(src)?;
        let timeout_ms = self.config.timeout_ms;

        let result = if timeout_ms == 0 {
            self.load_source(&source).await
        } else {
            tokio::time::timeout(Duration::from_millis(timeout_ms), self.load_source(&source))
                .await
                .map_err(|_| Error::Timeout(timeout_ms))?
        };

        match &result {
            Ok(bmp) => debug!("loaded {} ({}x{})", source, bmp.width(), bmp.height()),
            Err(e) => warn!("failed to load {}: {}", source, e),
        }
        result
    }

    /// Load several images concurrently. Results keep the input order.
    pub async fn load_all(&self, srcs: &[&str]) -> Vec<Result<Bitmap>> {
        join_all(srcs.iter().map(|src| self.load(src))).await
    }

    async fn load_source(&self, source: &ImageSource) -> Result<Bitmap> {
        let bytes = self.fetch(source).await?;
        Bitmap::decode_within(&bytes, self.config.max_width, self.config.max_height)
    }

    /// Fetch the encoded bytes for `source` without decoding them.
    ///
    /// Payloads over `max_bytes` are refused as early as the source allows:
    /// files by their metadata, HTTP bodies by `Content-Length` or once the
    /// streamed body passes the limit.
    pub async fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>> {
        let bytes = match source {
            ImageSource::Data { bytes, .. } => {
                self.check_size(source, bytes.len() as u64)?;
                bytes.clone()
            }
            ImageSource::File(path) => {
                let io_err = |e: std::io::Error| {
                    Error::LoadError(format!("{}: {}", path.display(), e))
                };
                let meta = tokio::fs::metadata(path).await.map_err(io_err)?;
                self.check_size(source, meta.len())?;
                tokio::fs::read(path).await.map_err(io_err)?
            }
            ImageSource::Http(url) => self.fetch_http(url).await?,
        };
        // a file may grow between the metadata call and the read
        self.check_size(source, bytes.len() as u64)?;
        Ok(bytes)
    }

    fn check_size(&self, what: &dyn fmt::Display, len: u64) -> Result<()> {
        if len > self.config.max_bytes {
            return Err(Error::LoadError(format!(
                "{} is larger than {} bytes ({} seen)",
                what, self.config.max_bytes, len
            )));
        }
        Ok(())
    }

    #[cfg(feature = "http")]
    async fn fetch_http(&self, url: &url::Url) -> Result<Vec<u8>> {
        let mut res = self.client.get(url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::LoadError(format!("HTTP {} for {}", status.as_u16(), url)));
        }
        if let Some(len) = res.content_length() {
            self.check_size(url, len)?;
        }

        let mut body = Vec::new();
        while let Some(chunk) = res.chunk().await? {
            body.extend_from_slice(&chunk);
            self.check_size(url, body.len() as u64)?;
        }
        Ok(body)
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_http(&self, url: &url::Url) -> Result<Vec<u8>> {
        Err(Error::LoadError(format!(
            "cannot fetch {}: built without the `http` feature",
            url
        )))
    }
}

/// Load lifecycle of an [`HtmlImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Unloaded,
    Loading,
    Ready(Bitmap),
    Failed(String),
}

/// An image element: a source locator plus its load state.
///
/// Setting a new source drops any previous bitmap and returns the element to
/// `Unloaded`.
#[derive(Debug, Clone)]
pub struct HtmlImage {
    src: Option<String>,
    state: ImageState,
}

impl Default for HtmlImage {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlImage {
    pub fn new() -> Self {
        Self {
            src: None,
            state: ImageState::Unloaded,
        }
    }

    pub fn with_src(src: &str) -> Self {
        let mut img = Self::new();
        img.set_src(src);
        img
    }

    pub fn set_src(&mut self, src: &str) {
        self.src = Some(src.to_string());
        self.state = ImageState::Unloaded;
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// True once loading finished, successfully or not.
    pub fn is_complete(&self) -> bool {
        matches!(self.state, ImageState::Ready(_) | ImageState::Failed(_))
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        match &self.state {
            ImageState::Ready(bmp) => Some(bmp),
            _ => None,
        }
    }

    /// Take the decoded bitmap out of a ready image.
    pub fn into_bitmap(self) -> Option<Bitmap> {
        match self.state {
            ImageState::Ready(bmp) => Some(bmp),
            _ => None,
        }
    }

    /// Natural width, `0` until the image is ready.
    pub fn natural_width(&self) -> u32 {
        self.bitmap().map_or(0, Bitmap::width)
    }

    /// Natural height, `0` until the image is ready.
    pub fn natural_height(&self) -> u32 {
        self.bitmap().map_or(0, Bitmap::height)
    }

    /// Run the load for the current source and resolve with the bitmap.
    pub async fn load(&mut self, loader: &ImageLoader) -> Result<&Bitmap> {
        let src = self
            .src
            .clone()
            .ok_or_else(|| Error::InvalidSource("image has no source".into()))?;

        self.state = ImageState::Loading;
        match loader.load(&src).await {
            Ok(bmp) => self.state = ImageState::Ready(bmp),
            Err(err) => {
                self.state = ImageState::Failed(err.to_string());
                return Err(err);
            }
        }

        self.bitmap()
            .ok_or_else(|| Error::Other(format!("image {} lost its bitmap", src)))
    }
}
