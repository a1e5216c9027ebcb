//! Drawing loaded images onto a surface.

use futures::future::join_all;
use log::debug;

use crate::loader::{HtmlImage, ImageLoader};
use crate::surface::Surface;
use crate::Result;

/// Load the image named by `src` and paint it at the surface origin.
///
/// Resolves after the paint. Load failures reject with the loader's error
/// and leave the surface untouched.
pub async fn draw_image_to_canvas<S>(
    surface: &mut S,
    src: &str,
    loader: &ImageLoader,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    draw_image_at(surface, src, 0, 0, loader).await
}

/// Like [`draw_image_to_canvas`], with the top-left corner at `(x, y)`.
/// Parts that fall outside the surface are clipped.
pub async fn draw_image_at<S>(
    surface: &mut S,
    src: &str,
    x: i32,
    y: i32,
    loader: &ImageLoader,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let mut image = HtmlImage::with_src(src);
    let bitmap = image.load(loader).await?;
    surface.draw_image(bitmap, x, y)
}

/// An image and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub src: String,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(src: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            src: src.into(),
            x,
            y,
        }
    }
}

/// Load every placement concurrently, then paint them in order.
///
/// Nothing is painted unless every image loads; the first failure in
/// placement order is returned.
pub async fn draw_images_to_canvas<S>(
    surface: &mut S,
    placements: &[Placement],
    loader: &ImageLoader,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let mut images: Vec<HtmlImage> = placements
        .iter()
        .map(|p| HtmlImage::with_src(&p.src))
        .collect();
    let loads = images.iter_mut().map(move |img| img.load(loader));
    let bitmaps = join_all(loads).await.into_iter().collect::<Result<Vec<_>>>()?;

    for (p, bmp) in placements.iter().zip(&bitmaps) {
        surface.draw_image(bmp, p.x, p.y)?;
    }
    debug!("painted {} images", bitmaps.len());
    Ok(())
}
