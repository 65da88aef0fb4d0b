//! Error types for the lsb-watermark crate.

/// Errors that can occur while embedding or extracting a watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A resize target or source image has a zero dimension.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The watermarked image and the original carrier do not line up.
    #[error("shape mismatch: carrier is {expected}, watermarked image is {actual}")]
    ShapeMismatch {
        /// Shape of the original carrier, e.g. `"640x480 RGB"`.
        expected: String,
        /// Shape of the watermarked image.
        actual: String,
    },

    /// The embedding method label or code is not one of the three variants.
    #[error("unknown embedding method: {0}")]
    UnknownMethod(String),

    /// The pixel layout cannot carry an 8-bit LSB plane.
    #[error("unsupported color type: {0}")]
    UnsupportedColor(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported (or would destroy the LSB plane).
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("jpeg".to_string());
        assert!(unsupported.to_string().contains("jpeg"));

        let dims = Error::InvalidDimensions {
            width: 0,
            height: 20,
        };
        assert!(dims.to_string().contains("0x20"));

        let mismatch = Error::ShapeMismatch {
            expected: "4x4 RGB".to_string(),
            actual: "4x2 RGB".to_string(),
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("4x4 RGB"));
        assert!(msg.contains("4x2 RGB"));

        let method = Error::UnknownMethod("xor".to_string());
        assert!(method.to_string().contains("xor"));
    }
}
