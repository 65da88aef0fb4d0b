//! File-level embed/extract pipeline.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat};
use log::{info, warn};

use crate::binarize::{self, WATERMARK_THRESHOLD};
use crate::codec;
use crate::error::{Error, Result};
use crate::method::Method;

/// Options controlling file processing behavior.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Embedding method; extraction must use the same one.
    pub method: Method,
    /// Cut used to pre-binarize the watermark image before embedding.
    pub watermark_threshold: u8,
    /// Print a detail line after each status line.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            watermark_threshold: WATERMARK_THRESHOLD,
            verbose: false,
            quiet: false,
        }
    }
}

/// Where extraction gets the watermark's original size from.
#[derive(Debug, Clone)]
pub enum WatermarkSource {
    /// Explicit width and height.
    Dimensions {
        /// Watermark width in pixels.
        width: u32,
        /// Watermark height in pixels.
        height: u32,
    },
    /// The original watermark file; only its dimensions are read.
    File(PathBuf),
}

impl WatermarkSource {
    /// Resolve to `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the watermark file cannot be read.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        match self {
            Self::Dimensions { width, height } => Ok((*width, *height)),
            Self::File(path) => Ok(image::image_dimensions(path)?),
        }
    }
}

/// Summary of a successful [`embed_file`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Where the watermarked image was written.
    pub output: PathBuf,
    /// Carrier (and output) dimensions.
    pub carrier_size: (u32, u32),
    /// Original watermark dimensions; needed later for extraction.
    pub watermark_size: (u32, u32),
    /// Method used.
    pub method: Method,
}

/// Summary of a successful [`extract_file`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Where the recovered bitmap was written.
    pub output: PathBuf,
    /// Recovered bitmap dimensions.
    pub watermark_size: (u32, u32),
    /// Method used.
    pub method: Method,
}

/// Load a carrier, converting layouts the codec cannot handle to 8-bit RGB or RGBA.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_carrier(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)?;
    Ok(match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => img,
        other => {
            warn!(
                "{}: converting {:?} to 8 bits per channel",
                path.display(),
                other.color()
            );
            if other.color().has_alpha() {
                DynamicImage::ImageRgba8(other.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(other.to_rgb8())
            }
        }
    })
}

/// Load a watermark as grayscale and binarize it at `threshold`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_watermark(path: &Path, threshold: u8) -> Result<GrayImage> {
    let gray = image::open(path)?.to_luma8();
    Ok(binarize::binarize(&gray, threshold))
}

/// Embed the watermark at `watermark` into the carrier at `carrier` and save
/// the result to `output`.
///
/// # Errors
///
/// Returns an error if loading, embedding or saving fails.
pub fn embed_file(
    carrier: &Path,
    watermark: &Path,
    output: &Path,
    opts: &ProcessOptions,
) -> Result<EmbedReport> {
    let carrier_img = load_carrier(carrier)?;
    let mark = load_watermark(watermark, opts.watermark_threshold)?;
    info!(
        "embedding {} ({}x{}) into {} ({}x{}) using {}",
        watermark.display(),
        mark.width(),
        mark.height(),
        carrier.display(),
        carrier_img.width(),
        carrier_img.height(),
        opts.method.label(),
    );

    let marked = codec::embed_dynamic(&carrier_img, &mark, opts.method)?;
    save_image(&marked, output)?;

    Ok(EmbedReport {
        output: output.to_path_buf(),
        carrier_size: (carrier_img.width(), carrier_img.height()),
        watermark_size: mark.dimensions(),
        method: opts.method,
    })
}

/// Recover the watermark from `watermarked` using the original `carrier`
/// and save the bitmap to `output`.
///
/// # Errors
///
/// Returns an error if loading, extraction or saving fails, including
/// [`Error::ShapeMismatch`] when the two images do not line up.
pub fn extract_file(
    watermarked: &Path,
    carrier: &Path,
    size: &WatermarkSource,
    output: &Path,
    opts: &ProcessOptions,
) -> Result<ExtractReport> {
    let (width, height) = size.dimensions()?;
    let marked_img = load_carrier(watermarked)?;
    let carrier_img = load_carrier(carrier)?;
    info!(
        "extracting {width}x{height} watermark from {} using {}",
        watermarked.display(),
        opts.method.label(),
    );

    let recovered =
        codec::extract_dynamic(&marked_img, &carrier_img, width, height, opts.method)?;
    save_image(&DynamicImage::ImageLuma8(recovered), output)?;

    Ok(ExtractReport {
        output: output.to_path_buf(),
        watermark_size: (width, height),
        method: opts.method,
    })
}

/// Check if a file has a supported input image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "bmp" | "tif" | "tiff" | "jpg" | "jpeg" | "gif" | "webp"
        ),
        None => false,
    }
}

/// Save an image losslessly, creating the parent directory if needed.
///
/// Only PNG, BMP and TIFF are written; lossy formats would scramble the LSB
/// plane.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &DynamicImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff => {}
        ImageFormat::Jpeg | ImageFormat::WebP => {
            return Err(Error::UnsupportedFormat(format!(
                "{format:?} is lossy and would destroy the watermark"
            )));
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    img.save_with_format(path, format)?;
    Ok(())
}

/// Generate a default PNG output path next to `input`.
///
/// Example: `"photo.jpg"` with suffix `"watermarked"` becomes
/// `"photo_watermarked.png"`.
#[must_use]
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_{suffix}.png"))
}
