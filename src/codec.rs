//! Embedding and extraction over whole images.
//!
//! The watermark is stretched (or shrunk) once to the carrier's resolution and
//! every colour sample is then encoded against the watermark value at its
//! pixel. Alpha channels are copied through untouched.

use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};
use log::{debug, warn};

use crate::binarize::{self, EXTRACTION_THRESHOLD};
use crate::error::{Error, Result};
use crate::method::Method;
use crate::sampler;

/// Channel whose bit plane `extract` carries forward: red for RGB and RGBA, luma
/// for grayscale.
const RECOVERY_CHANNEL: usize = 0;

/// Number of leading channels of `P` that carry colour (alpha excluded).
fn colour_channels<P: Pixel>() -> usize {
    let total = usize::from(P::CHANNEL_COUNT);
    if P::COLOR_MODEL.ends_with('A') {
        total - 1
    } else {
        total
    }
}

fn describe<P: Pixel>(width: u32, height: u32) -> String {
    format!("{width}x{height} {}", P::COLOR_MODEL)
}

fn encode_pixel(samples: &mut [u8], bit: u8, colour: usize, method: Method) {
    for s in &mut samples[..colour] {
        *s = method.embed_bit(*s, bit);
    }
}

/// Embed `watermark` into the LSB plane of every colour channel of `carrier`.
///
/// The watermark is resized to the carrier's dimensions with
/// [`sampler::resize_nearest`]; it should already be binary (0/255), though
/// only each value's lowest bit is used. The carrier is never modified: the
/// result is a freshly allocated image of the same type and size.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if either image is empty.
pub fn embed<P>(
    carrier: &ImageBuffer<P, Vec<u8>>,
    watermark: &GrayImage,
    method: Method,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = carrier.dimensions();
    if !binarize::is_binary(watermark) {
        warn!("watermark is not two-level; only the lowest bit of each sample is embedded");
    }

    let mark = sampler::resize_nearest(watermark, width, height)?;
    let channels = usize::from(P::CHANNEL_COUNT);
    let colour = colour_channels::<P>();
    debug!(
        "embedding {}x{} watermark into {} carrier ({colour} colour channels, method {method})",
        watermark.width(),
        watermark.height(),
        describe::<P>(width, height),
    );

    let mut samples = carrier.as_raw().clone();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        samples
            .par_chunks_exact_mut(channels)
            .zip(mark.as_raw().par_iter())
            .for_each(|(px, &bit)| encode_pixel(px, bit, colour, method));
    }

    #[cfg(not(feature = "parallel"))]
    {
        samples
            .chunks_exact_mut(channels)
            .zip(mark.as_raw().iter())
            .for_each(|(px, &bit)| encode_pixel(px, bit, colour, method));
    }

    ImageBuffer::from_raw(width, height, samples).ok_or(Error::InvalidDimensions { width, height })
}

/// Decode one colour channel into a plane of `0`/`1` values.
fn decode_channel<P>(
    watermarked: &ImageBuffer<P, Vec<u8>>,
    carrier: &ImageBuffer<P, Vec<u8>>,
    channel: usize,
    method: Method,
) -> Vec<u8>
where
    P: Pixel<Subpixel = u8>,
{
    let channels = usize::from(P::CHANNEL_COUNT);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        watermarked
            .as_raw()
            .par_chunks_exact(channels)
            .zip(carrier.as_raw().par_chunks_exact(channels))
            .map(|(m, c)| method.extract_bit(m[channel], c[channel]))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        watermarked
            .as_raw()
            .chunks_exact(channels)
            .zip(carrier.as_raw().chunks_exact(channels))
            .map(|(m, c)| method.extract_bit(m[channel], c[channel]))
            .collect()
    }
}

fn check_shape<P>(
    watermarked: &ImageBuffer<P, Vec<u8>>,
    carrier: &ImageBuffer<P, Vec<u8>>,
) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
{
    if watermarked.dimensions() == carrier.dimensions() {
        return Ok(());
    }
    let (cw, ch) = carrier.dimensions();
    let (mw, mh) = watermarked.dimensions();
    Err(Error::ShapeMismatch {
        expected: describe::<P>(cw, ch),
        actual: describe::<P>(mw, mh),
    })
}

/// Recover one full-resolution bit plane (values `0`/`1`) per colour channel.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the two images differ in size.
pub fn extract_planes<P>(
    watermarked: &ImageBuffer<P, Vec<u8>>,
    carrier: &ImageBuffer<P, Vec<u8>>,
    method: Method,
) -> Result<Vec<GrayImage>>
where
    P: Pixel<Subpixel = u8>,
{
    check_shape(watermarked, carrier)?;
    let (width, height) = carrier.dimensions();

    (0..colour_channels::<P>())
        .map(|channel| {
            GrayImage::from_raw(
                width,
                height,
                decode_channel(watermarked, carrier, channel, method),
            )
            .ok_or(Error::InvalidDimensions { width, height })
        })
        .collect()
}

/// Recover the watermark from `watermarked` given the original `carrier`.
///
/// The bit field of the red channel (the only colour channel for grayscale)
/// is resized to `width × height` (the watermark's original size) and
/// re-binarized to 0/255. `method` must be the one used for embedding.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the images differ in size, and
/// [`Error::InvalidDimensions`] for a zero target size.
pub fn extract<P>(
    watermarked: &ImageBuffer<P, Vec<u8>>,
    carrier: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
    method: Method,
) -> Result<GrayImage>
where
    P: Pixel<Subpixel = u8>,
{
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    check_shape(watermarked, carrier)?;

    let (cw, ch) = carrier.dimensions();
    let channel = RECOVERY_CHANNEL;
    debug!(
        "extracting {width}x{height} watermark from {} image (channel {channel}, method {method})",
        describe::<P>(cw, ch),
    );

    let bits = GrayImage::from_raw(cw, ch, decode_channel(watermarked, carrier, channel, method))
        .ok_or(Error::InvalidDimensions {
            width: cw,
            height: ch,
        })?;
    let resized = sampler::resize_nearest(&bits, width, height)?;
    Ok(binarize::binarize(&resized, EXTRACTION_THRESHOLD))
}

/// [`embed`] for a decoded image of any 8-bit layout (L, LA, RGB, RGBA).
///
/// # Errors
///
/// Returns [`Error::UnsupportedColor`] for other layouts, plus any error of
/// [`embed`].
pub fn embed_dynamic(
    carrier: &DynamicImage,
    watermark: &GrayImage,
    method: Method,
) -> Result<DynamicImage> {
    match carrier {
        DynamicImage::ImageLuma8(img) => embed(img, watermark, method).map(DynamicImage::ImageLuma8),
        DynamicImage::ImageLumaA8(img) => {
            embed(img, watermark, method).map(DynamicImage::ImageLumaA8)
        }
        DynamicImage::ImageRgb8(img) => embed(img, watermark, method).map(DynamicImage::ImageRgb8),
        DynamicImage::ImageRgba8(img) => {
            embed(img, watermark, method).map(DynamicImage::ImageRgba8)
        }
        other => Err(Error::UnsupportedColor(format!("{:?}", other.color()))),
    }
}

/// [`extract`] for decoded images of any 8-bit layout (L, LA, RGB, RGBA).
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the two images have different layouts
/// or sizes, [`Error::UnsupportedColor`] for other layouts, plus any error of
/// [`extract`].
pub fn extract_dynamic(
    watermarked: &DynamicImage,
    carrier: &DynamicImage,
    width: u32,
    height: u32,
    method: Method,
) -> Result<GrayImage> {
    match (watermarked, carrier) {
        (DynamicImage::ImageLuma8(m), DynamicImage::ImageLuma8(c)) => {
            extract(m, c, width, height, method)
        }
        (DynamicImage::ImageLumaA8(m), DynamicImage::ImageLumaA8(c)) => {
            extract(m, c, width, height, method)
        }
        (DynamicImage::ImageRgb8(m), DynamicImage::ImageRgb8(c)) => {
            extract(m, c, width, height, method)
        }
        (DynamicImage::ImageRgba8(m), DynamicImage::ImageRgba8(c)) => {
            extract(m, c, width, height, method)
        }
        _ if watermarked.color() != carrier.color() => Err(Error::ShapeMismatch {
            expected: format!("{}x{} {:?}", carrier.width(), carrier.height(), carrier.color()),
            actual: format!(
                "{}x{} {:?}",
                watermarked.width(),
                watermarked.height(),
                watermarked.color()
            ),
        }),
        _ => Err(Error::UnsupportedColor(format!("{:?}", carrier.color()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gray(width: u32, height: u32, data: &[u8]) -> GrayImage {
        GrayImage::from_raw(width, height, data.to_vec()).unwrap()
    }

    fn diagonal_mark() -> GrayImage {
        gray(2, 2, &[255, 0, 0, 255])
    }

    #[test]
    fn uniform_carrier_direct_embeds_upsampled_bits() {
        let carrier = gray(4, 4, &[200; 16]);
        let out = embed(&carrier, &diagonal_mark(), Method::Direct).unwrap();
        #[rustfmt::skip]
        let expected = [
            201, 201, 200, 200,
            201, 201, 200, 200,
            200, 200, 201, 201,
            200, 200, 201, 201,
        ];
        assert_eq!(out.as_raw().as_slice(), &expected);

        let recovered = extract(&out, &carrier, 2, 2, Method::Direct).unwrap();
        assert_eq!(recovered, diagonal_mark());
    }

    #[test]
    fn bitwise_add_collapses_to_direct_on_even_carrier() {
        let carrier = gray(4, 4, &[200; 16]);
        let direct = embed(&carrier, &diagonal_mark(), Method::Direct).unwrap();
        let added = embed(&carrier, &diagonal_mark(), Method::BitwiseAdd).unwrap();
        assert_eq!(direct, added);

        let recovered = extract(&added, &carrier, 2, 2, Method::BitwiseAdd).unwrap();
        assert_eq!(recovered, diagonal_mark());
    }

    #[test]
    fn bitwise_add_on_odd_and_even_samples() {
        let carrier = gray(2, 1, &[1, 2]);
        let mark = gray(2, 1, &[255, 255]);
        let out = embed(&carrier, &mark, Method::BitwiseAdd).unwrap();
        assert_eq!(out.as_raw().as_slice(), &[0, 3]);

        let planes = extract_planes(&out, &carrier, Method::BitwiseAdd).unwrap();
        assert_eq!(planes.len(), 1);
        assert_eq!(planes[0].as_raw().as_slice(), &[1, 1]);

        let recovered = extract(&out, &carrier, 2, 1, Method::BitwiseAdd).unwrap();
        assert_eq!(recovered.as_raw().as_slice(), &[255, 255]);
    }

    #[test]
    fn embedding_only_touches_the_lsb() {
        let carrier = RgbImage::from_fn(9, 7, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 37 + y * 91) % 256) as u8;
            Rgb([v, v.wrapping_add(1), v.wrapping_mul(3)])
        });
        let mark = gray(3, 2, &[255, 0, 255, 0, 0, 255]);
        for method in Method::ALL {
            let out = embed(&carrier, &mark, method).unwrap();
            assert_eq!(out.dimensions(), carrier.dimensions());
            for (m, c) in out.as_raw().iter().zip(carrier.as_raw()) {
                assert_eq!((m ^ c) & 0xFE, 0, "{method}");
            }
        }
    }

    #[test]
    fn every_colour_channel_carries_the_same_bit() {
        let carrier = RgbImage::from_pixel(4, 4, Rgb([10, 11, 12]));
        let out = embed(&carrier, &diagonal_mark(), Method::NegatedBitwiseAdd).unwrap();
        let planes = extract_planes(&out, &carrier, Method::NegatedBitwiseAdd).unwrap();
        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0], planes[1]);
        assert_eq!(planes[1], planes[2]);
        assert_eq!(planes[0].get_pixel(0, 0)[0], 1);
        assert_eq!(planes[0].get_pixel(3, 0)[0], 0);
    }

    #[test]
    fn extraction_follows_the_red_plane_when_planes_disagree() {
        let carrier = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));

        let red_set = RgbImage::from_pixel(2, 1, Rgb([101, 100, 100]));
        let recovered = extract(&red_set, &carrier, 2, 1, Method::Direct).unwrap();
        assert_eq!(recovered.as_raw().as_slice(), &[255, 255]);

        let blue_set = RgbImage::from_pixel(2, 1, Rgb([100, 100, 101]));
        let recovered = extract(&blue_set, &carrier, 2, 1, Method::Direct).unwrap();
        assert_eq!(recovered.as_raw().as_slice(), &[0, 0]);

        let planes = extract_planes(&blue_set, &carrier, Method::Direct).unwrap();
        assert_eq!(planes[2].as_raw().as_slice(), &[1, 1]);
    }

    #[test]
    fn alpha_channel_is_copied_through() {
        let carrier = RgbaImage::from_pixel(4, 4, Rgba([100, 101, 102, 77]));
        let out = embed(&carrier, &diagonal_mark(), Method::Direct).unwrap();
        for px in out.pixels() {
            assert_eq!(px[3], 77);
        }
        assert_eq!(colour_channels::<Rgba<u8>>(), 3);
        assert_eq!(colour_channels::<image::LumaA<u8>>(), 1);

        let recovered = extract(&out, &carrier, 2, 2, Method::Direct).unwrap();
        assert_eq!(recovered, diagonal_mark());
    }

    #[test]
    fn wrong_method_does_not_recover_the_watermark() {
        // lsb(carrier) alternates in a checkerboard
        let carrier = GrayImage::from_fn(16, 16, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 7 + y * 13) % 256) as u8;
            image::Luma([v])
        });
        let mark = GrayImage::from_fn(16, 16, |x, y| {
            image::Luma([if (x / 4 + y / 3) % 2 == 0 { 255 } else { 0 }])
        });
        let out = embed(&carrier, &mark, Method::BitwiseAdd).unwrap();
        let wrong = extract(&out, &carrier, 16, 16, Method::Direct).unwrap();

        let errors = wrong
            .as_raw()
            .iter()
            .zip(mark.as_raw())
            .filter(|(a, b)| a != b)
            .count();
        assert!(errors * 4 > mark.as_raw().len(), "only {errors} bit errors");

        let right = extract(&out, &carrier, 16, 16, Method::BitwiseAdd).unwrap();
        assert_eq!(right, mark);
    }

    #[test]
    fn carrier_is_left_unchanged() {
        let carrier = gray(4, 4, &[7; 16]);
        let before = carrier.clone();
        let out = embed(&carrier, &diagonal_mark(), Method::Direct).unwrap();
        assert_eq!(carrier, before);
        assert_ne!(out, carrier);
    }

    #[test]
    fn extraction_rejects_mismatched_shapes() {
        let carrier = gray(4, 4, &[0; 16]);
        let other = gray(4, 2, &[0; 8]);
        assert!(matches!(
            extract(&other, &carrier, 2, 2, Method::Direct),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            extract_planes(&other, &carrier, Method::Direct),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn extraction_rejects_zero_target() {
        let carrier = gray(4, 4, &[0; 16]);
        assert!(matches!(
            extract(&carrier, &carrier, 0, 2, Method::Direct),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn dynamic_dispatch_preserves_layout() {
        let carrier = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 6, Rgb([50, 60, 70])));
        let out = embed_dynamic(&carrier, &diagonal_mark(), Method::BitwiseAdd).unwrap();
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));

        let recovered = extract_dynamic(&out, &carrier, 2, 2, Method::BitwiseAdd).unwrap();
        assert_eq!(recovered, diagonal_mark());
    }

    #[test]
    fn dynamic_dispatch_rejects_layout_mismatch_and_wide_samples() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let luma = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(matches!(
            extract_dynamic(&rgb, &luma, 2, 2, Method::Direct),
            Err(Error::ShapeMismatch { .. })
        ));

        let wide = DynamicImage::ImageRgb16(image::ImageBuffer::new(4, 4));
        assert!(matches!(
            embed_dynamic(&wide, &diagonal_mark(), Method::Direct),
            Err(Error::UnsupportedColor(_))
        ));
        assert!(matches!(
            extract_dynamic(&wide, &wide, 2, 2, Method::Direct),
            Err(Error::UnsupportedColor(_))
        ));
    }
}
