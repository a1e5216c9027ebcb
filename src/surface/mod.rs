//! Rendering surfaces and their pixel buffers

pub mod canvas;
pub mod composite;

pub use canvas::Canvas;

use crate::bitmap::Bitmap;
use crate::{Error, Result};
use sha2::{Digest, Sha256};

/// Number of bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Byte length of a `width x height` RGBA buffer, or `None` on overflow.
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// A rectangular RGBA pixel buffer, row-major, four bytes per pixel.
///
/// `data.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// A transparent black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height).ok_or_else(|| {
            Error::RenderError(format!("buffer {}x{} is too large", width, height))
        })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap existing RGBA bytes; fails when the length does not match.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        match buffer_len(width, height) {
            Some(len) if len == data.len() => Ok(Self {
                width,
                height,
                data,
            }),
            _ => Err(Error::RenderError(format!(
                "{} bytes do not describe a {}x{} RGBA buffer",
                data.len(),
                width,
                height
            ))),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.data[i..i + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate over pixels as 4-byte RGBA slices.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(BYTES_PER_PIXEL)
    }

    /// Hex SHA-256 over the dimensions and pixel bytes.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }
}

/// A rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// The region covering a whole `width x height` surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the region lies entirely inside a `width x height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// A 2D drawable area with snapshot/commit access to its pixels.
///
/// These are the host-canvas primitives the drawing helpers are written
/// against: `get_image_data` reads, `put_image_data` writes, `draw_image`
/// paints a decoded bitmap with source-over compositing.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Copy out the pixels covered by `region`.
    fn get_image_data(&self, region: Region) -> Result<ImageData>;

    /// Replace the pixels at `(x, y)` with `data`, without compositing.
    fn put_image_data(&mut self, data: &ImageData, x: u32, y: u32) -> Result<()>;

    /// Paint `image` at its natural size with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Bitmap, x: i32, y: i32) -> Result<()>;

    /// The full extent of the surface, read once.
    fn extent(&self) -> Region {
        Region::full(self.width(), self.height())
    }
}
