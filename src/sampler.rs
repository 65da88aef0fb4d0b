//! Nearest-neighbour resampling for single-channel bitmaps.
//!
//! Watermark bits must stay hard-edged, so no filter that blends neighbouring
//! samples is ever applied.

use image::GrayImage;

use crate::error::{Error, Result};

/// Resize `source` to exactly `width × height` using nearest-neighbour
/// sampling.
///
/// Destination `(dx, dy)` reads the source sample at
/// `(dx * src_w / dst_w, dy * src_h / dst_h)`, using floor division. The same
/// rule serves upsampling and downsampling.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the target or the source has a
/// zero dimension.
pub fn resize_nearest(source: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(Error::InvalidDimensions {
            width: src_w,
            height: src_h,
        });
    }
    if (src_w, src_h) == (width, height) {
        return Ok(source.clone());
    }

    let x_map = axis_map(src_w, width);
    let y_map = axis_map(src_h, height);

    Ok(GrayImage::from_fn(width, height, |x, y| {
        *source.get_pixel(x_map[x as usize], y_map[y as usize])
    }))
}

/// Source index for every destination index along one axis.
// The quotient is below `src_len` because `d < dst_len`, so it fits in u32.
#[allow(clippy::cast_possible_truncation)]
fn axis_map(src_len: u32, dst_len: u32) -> Vec<u32> {
    (0..dst_len)
        .map(|d| (u64::from(d) * u64::from(src_len) / u64::from(dst_len)) as u32)
        .collect()
}
