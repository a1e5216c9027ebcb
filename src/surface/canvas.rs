//! In-memory RGBA canvas

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::bitmap::Bitmap;
use crate::surface::{composite, ImageData, Region, Surface, BYTES_PER_PIXEL};
use crate::{check_canvas_size, CanvasConfig, Error, Result};

/// A software canvas holding a single RGBA buffer.
///
/// A fresh canvas is transparent black, like a new HTML `<canvas>`.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: ImageData,
}

impl Canvas {
    /// Fails with `ConfigError` above [`crate::MAX_CANVAS_PIXELS`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_canvas_size(width, height)?;
        Ok(Self {
            pixels: ImageData::new(width, height)?,
        })
    }

    /// Create a canvas sized from `config`.
    pub fn with_config(config: &CanvasConfig) -> Result<Self> {
        Self::new(config.width, config.height)
    }

    /// Resize the canvas. Like setting `canvas.width`, this clears it.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_canvas_size(width, height)?;
        self.pixels = ImageData::new(width, height)?;
        Ok(())
    }

    /// Fill every pixel with `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn image_data(&self) -> &ImageData {
        &self.pixels
    }

    /// Encode the canvas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        if self.pixels.is_empty() {
            return Err(Error::RenderError("cannot encode an empty canvas".into()));
        }
        let img = RgbaImage::from_raw(
            self.pixels.width(),
            self.pixels.height(),
            self.pixels.data().to_vec(),
        )
        .ok_or_else(|| Error::RenderError("pixel buffer does not match canvas size".into()))?;

        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
        Ok(out.into_inner())
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_png()?;
        std::fs::write(path, &bytes)
            .map_err(|e| Error::RenderError(format!("{}: {}", path.display(), e)))?;
        debug!("wrote {} PNG bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn get_image_data(&self, region: Region) -> Result<ImageData> {
        if !region.fits_within(self.width(), self.height()) {
            return Err(Error::RenderError(format!(
                "region {:?} is outside the {}x{} canvas",
                region,
                self.width(),
                self.height()
            )));
        }

        let mut out = ImageData::new(region.width, region.height)?;
        let row_len = region.width as usize * BYTES_PER_PIXEL;
        let stride = self.width() as usize * BYTES_PER_PIXEL;
        let src = self.pixels.data();
        for (row, dst) in out.data_mut().chunks_exact_mut(row_len.max(1)).enumerate() {
            let off = (region.y as usize + row) * stride + region.x as usize * BYTES_PER_PIXEL;
            dst.copy_from_slice(&src[off..off + row_len]);
        }
        Ok(out)
    }

    fn put_image_data(&mut self, data: &ImageData, x: u32, y: u32) -> Result<()> {
        let region = Region {
            x,
            y,
            width: data.width(),
            height: data.height(),
        };
        if !region.fits_within(self.width(), self.height()) {
            return Err(Error::RenderError(format!(
                "{}x{} buffer at ({}, {}) is outside the {}x{} canvas",
                data.width(),
                data.height(),
                x,
                y,
                self.width(),
                self.height()
            )));
        }
        if region.is_empty() {
            return Ok(());
        }

        let row_len = data.width() as usize * BYTES_PER_PIXEL;
        let stride = self.width() as usize * BYTES_PER_PIXEL;
        let dst = self.pixels.data_mut();
        for (row, src) in data.data().chunks_exact(row_len).enumerate() {
            let off = (y as usize + row) * stride + x as usize * BYTES_PER_PIXEL;
            dst[off..off + row_len].copy_from_slice(src);
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &Bitmap, x: i32, y: i32) -> Result<()> {
        let touched = composite::blit(&mut self.pixels, image.pixels(), x, y);
        debug!(
            "painted {}x{} bitmap at ({}, {}), {} pixels visible",
            image.width(),
            image.height(),
            x,
            y,
            touched
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_and_commit_subregion() {
        let mut c = Canvas::new(4, 3).unwrap();
        c.fill([1, 2, 3, 4]);

        let region = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let mut snap = c.get_image_data(region).unwrap();
        assert_eq!(snap.width(), 2);
        assert!(snap.pixels().all(|p| p == [1, 2, 3, 4]));

        snap.data_mut().fill(9);
        c.put_image_data(&snap, 1, 1).unwrap();
        assert_eq!(c.image_data().pixel(2, 2), Some([9, 9, 9, 9]));
        assert_eq!(c.image_data().pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(c.image_data().pixel(3, 2), Some([1, 2, 3, 4]));
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let mut c = Canvas::new(2, 2).unwrap();
        let region = Region {
            x: 1,
            y: 0,
            width: 2,
            height: 1,
        };
        assert!(matches!(c.get_image_data(region), Err(Error::RenderError(_))));

        let data = ImageData::new(3, 1).unwrap();
        assert!(matches!(c.put_image_data(&data, 0, 0), Err(Error::RenderError(_))));
    }

    #[test]
    fn empty_snapshot_of_zero_canvas() {
        let c = Canvas::new(0, 0).unwrap();
        let snap = c.get_image_data(c.extent()).unwrap();
        assert!(snap.is_empty());
        assert!(c.to_png().is_err());
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocating() {
        assert!(matches!(Canvas::new(100_000, 100_000), Err(Error::ConfigError(_))));

        let mut c = Canvas::new(1, 1).unwrap();
        assert!(matches!(c.resize(u32::MAX, 2), Err(Error::ConfigError(_))));
        assert_eq!(c.width(), 1);
    }

    #[test]
    fn resize_clears() {
        let mut c = Canvas::new(1, 1).unwrap();
        c.fill([255; 4]);
        c.resize(2, 1).unwrap();
        assert_eq!(c.width(), 2);
        assert!(c.image_data().pixels().all(|p| p == [0, 0, 0, 0]));
    }

    #[test]
    fn png_has_signature() {
        let c = Canvas::new(8, 8).unwrap();
        let png = c.to_png().unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
