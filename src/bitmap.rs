//! Decoded images ready to be painted

use std::io::Cursor;

use image::{ImageReader, Limits};

use crate::surface::ImageData;
use crate::{Error, Result};

/// A decoded image: straight-alpha RGBA8 at its natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: ImageData,
}

impl Bitmap {
    /// Decode PNG or JPEG bytes, converting to RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Like [`Bitmap::decode`], but refuses images wider than `max_width` or
    /// taller than `max_height`. The header is checked before any pixel
    /// buffer is allocated.
    pub fn decode_within(bytes: &[u8], max_width: u32, max_height: u32) -> Result<Self> {
        let mut limits = Limits::default();
        limits.max_image_width = Some(max_width);
        limits.max_image_height = Some(max_height);

        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| Error::DecodeError(e.to_string()))?;
        reader.limits(limits);
        let rgba = reader.decode()?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Wrap raw RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            pixels: ImageData::from_vec(width, height, data)?,
        })
    }

    /// Natural width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Natural height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &ImageData {
        &self.pixels
    }
}

impl From<ImageData> for Bitmap {
    fn from(pixels: ImageData) -> Self {
        Self { pixels }
    }
}
