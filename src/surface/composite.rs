//! Source-over compositing of straight-alpha RGBA pixels

use crate::surface::{ImageData, BYTES_PER_PIXEL};

/// Composite one `src` pixel over one `dst` pixel in place.
///
/// Opaque sources and transparent destinations copy the source exactly.
#[inline]
pub fn source_over(dst: &mut [u8], src: &[u8]) {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    if sa == 255 || da == 0 {
        dst[..BYTES_PER_PIXEL].copy_from_slice(&src[..BYTES_PER_PIXEL]);
        return;
    }
    if sa == 0 {
        return;
    }

    // destination contribution, already scaled by (1 - sa)
    let dw = (da * (255 - sa) + 127) / 255;
    let out_a = sa + dw;
    for c in 0..3 {
        let v = (src[c] as u32 * sa + dst[c] as u32 * dw + out_a / 2) / out_a;
        dst[c] = v.min(255) as u8;
    }
    dst[3] = out_a.min(255) as u8;
}

/// Composite `src` onto `dst` with its top-left corner at `(x, y)`,
/// clipped to `dst`. Returns the number of pixels touched.
pub fn blit(dst: &mut ImageData, src: &ImageData, x: i32, y: i32) -> usize {
    let dw = dst.width() as i64;
    let dh = dst.height() as i64;
    let sw = src.width() as i64;
    let sh = src.height() as i64;

    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + sw).min(dw);
    let y1 = (y as i64 + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return 0;
    }

    let span = (x1 - x0) as usize;
    let dst_stride = dw as usize * BYTES_PER_PIXEL;
    let src_stride = sw as usize * BYTES_PER_PIXEL;
    let src_data = src.data();
    let dst_data = dst.data_mut();

    for dy in y0..y1 {
        let sy = (dy - y as i64) as usize;
        let sx = (x0 - x as i64) as usize;
        let s_off = sy * src_stride + sx * BYTES_PER_PIXEL;
        let d_off = dy as usize * dst_stride + x0 as usize * BYTES_PER_PIXEL;
        let s_row = &src_data[s_off..s_off + span * BYTES_PER_PIXEL];
        let d_row = &mut dst_data[d_off..d_off + span * BYTES_PER_PIXEL];
        for (d, s) in d_row
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(s_row.chunks_exact(BYTES_PER_PIXEL))
        {
            source_over(d, s);
        }
    }

    span * (y1 - y0) as usize
}
