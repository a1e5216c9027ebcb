//! Random per-pixel noise.
//!
//! Every pixel gets a base value drawn uniformly from `0..255`. Grayscale
//! noise copies it into red, green and blue; color noise draws each of the
//! three channels independently. Alpha is always 255.

use log::debug;
use rand::Rng;

use crate::surface::{ImageData, Region, Surface, BYTES_PER_PIXEL};
use crate::{Error, Result};

/// Exclusive upper bound of a noise channel value
const CHANNEL_BOUND: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseMode {
    /// Red, green and blue share one value per pixel
    #[default]
    Grayscale,
    /// Red, green and blue are drawn independently
    Color,
}

impl From<bool> for NoiseMode {
    /// `true` selects color noise.
    fn from(color: bool) -> Self {
        if color {
            NoiseMode::Color
        } else {
            NoiseMode::Grayscale
        }
    }
}

/// Overwrite every pixel of `data` with noise.
pub fn fill_noise<R: Rng>(data: &mut ImageData, mode: NoiseMode, rng: &mut R) {
    for px in data.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
        let base = rng.gen_range(0..CHANNEL_BOUND);
        let (r, g, b) = match mode {
            NoiseMode::Grayscale => (base, base, base),
            NoiseMode::Color => (
                rng.gen_range(0..CHANNEL_BOUND),
                rng.gen_range(0..CHANNEL_BOUND),
                rng.gen_range(0..CHANNEL_BOUND),
            ),
        };
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = 255;
    }
}

/// Fill the whole surface with noise from the thread-local RNG.
///
/// The extent is read once and used for both the snapshot and the commit.
/// A zero-area surface is left alone.
pub fn draw_noise_to_canvas<S: Surface + ?Sized>(surface: &mut S, color: bool) -> Result<()> {
    let extent = surface.extent();
    draw_noise_region(surface, extent, NoiseMode::from(color), &mut rand::thread_rng())
}

/// Fill `region` of the surface with noise from `rng`.
///
/// Snapshots the region, rewrites every channel in the local copy and
/// commits it back in one `put_image_data`.
pub fn draw_noise_region<S, R>(
    surface: &mut S,
    region: Region,
    mode: NoiseMode,
    rng: &mut R,
) -> Result<()>
where
    S: Surface + ?Sized,
    R: Rng,
{
    if region.is_empty() {
        debug!("noise skipped: empty region {:?}", region);
        return Ok(());
    }
    if !region.fits_within(surface.width(), surface.height()) {
        return Err(Error::RenderError(format!(
            "noise region {:?} is outside the {}x{} surface",
            region,
            surface.width(),
            surface.height()
        )));
    }

    let mut snapshot = surface.get_image_data(region)?;
    if snapshot.width() != region.width || snapshot.height() != region.height {
        return Err(Error::RenderError(format!(
            "surface returned {}x{} for a {}x{} region",
            snapshot.width(),
            snapshot.height(),
            region.width,
            region.height
        )));
    }

    fill_noise(&mut snapshot, mode, rng);
    surface.put_image_data(&snapshot, region.x, region.y)?;
    debug!("filled {}x{} with {:?} noise", region.width, region.height, mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn mode_from_flag() {
        assert_eq!(NoiseMode::from(false), NoiseMode::Grayscale);
        assert_eq!(NoiseMode::from(true), NoiseMode::Color);
        assert_eq!(NoiseMode::default(), NoiseMode::Grayscale);
    }

    #[test]
    fn grayscale_pixels_have_equal_channels() {
        let mut data = ImageData::new(16, 16).unwrap();
        fill_noise(&mut data, NoiseMode::Grayscale, &mut StdRng::seed_from_u64(7));
        for px in data.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert!(px[0] < 255);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let mut a = ImageData::new(8, 8).unwrap();
        let mut b = ImageData::new(8, 8).unwrap();
        fill_noise(&mut a, NoiseMode::Color, &mut StdRng::seed_from_u64(42));
        fill_noise(&mut b, NoiseMode::Color, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn region_noise_leaves_outside_untouched() {
        let mut c = Canvas::new(4, 4).unwrap();
        let region = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let mut rng = StdRng::seed_from_u64(1);
        draw_noise_region(&mut c, region, NoiseMode::Color, &mut rng).unwrap();

        assert_eq!(c.image_data().pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(c.image_data().pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(c.image_data().pixel(1, 1).unwrap()[3], 255);
        assert_eq!(c.image_data().pixel(2, 2).unwrap()[3], 255);
    }

    #[test]
    fn region_outside_surface_is_an_error() {
        let mut c = Canvas::new(2, 2).unwrap();
        let region = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        let mut rng = rand::thread_rng();
        let res = draw_noise_region(&mut c, region, NoiseMode::Grayscale, &mut rng);
        assert!(matches!(res, Err(Error::RenderError(_))));
    }
}
