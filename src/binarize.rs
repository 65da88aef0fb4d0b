//! Two-level thresholding of single-channel images.

use image::GrayImage;

/// Cut used to pre-binarize a watermark before embedding (midpoint of 0..=255).
pub const WATERMARK_THRESHOLD: u8 = 127;

/// Cut used to re-binarize an extracted bit field: any set bit becomes 255.
pub const EXTRACTION_THRESHOLD: u8 = 0;

/// Map every sample to `255` if it is strictly greater than `threshold`,
/// otherwise to `0`.
#[must_use]
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px[0] = if px[0] > threshold { 255 } else { 0 };
    }
    out
}

/// Whether every sample is either `0` or `255`.
#[must_use]
pub fn is_binary(image: &GrayImage) -> bool {
    image.as_raw().iter().all(|&v| v == 0 || v == 255)
}
