//! Hide a binary watermark in the least-significant bit plane of an image.
//!
//! The watermark is stretched to the carrier's resolution with
//! nearest-neighbour sampling and written into the LSB of every colour sample
//! using one of three [`Method`]s. Extraction needs the original carrier, the
//! same method, and the watermark's original size.
//!
//! # Quick Start
//!
//! ```no_run
//! use lsb_watermark::{binarize, codec, Method};
//!
//! let carrier = image::open("photo.png").unwrap().to_rgb8();
//! let mark = image::open("logo.png").unwrap().to_luma8();
//! let mark = binarize::binarize(&mark, binarize::WATERMARK_THRESHOLD);
//!
//! let marked = codec::embed(&carrier, &mark, Method::BitwiseAdd).unwrap();
//! let recovered = codec::extract(
//!     &marked,
//!     &carrier,
//!     mark.width(),
//!     mark.height(),
//!     Method::BitwiseAdd,
//! )
//! .unwrap();
//! assert_eq!(recovered.dimensions(), mark.dimensions());
//! ```
//!
//! # Files
//!
//! [`embed_file`] and [`extract_file`] wrap the codec with image loading,
//! watermark pre-binarization and lossless saving.
//!
//! ```no_run
//! use std::path::Path;
//! use lsb_watermark::{embed_file, extract_file, ProcessOptions, WatermarkSource};
//!
//! let opts = ProcessOptions::default();
//! let report = embed_file(
//!     Path::new("photo.png"),
//!     Path::new("logo.png"),
//!     Path::new("photo_watermarked.png"),
//!     &opts,
//! )
//! .unwrap();
//! let (width, height) = report.watermark_size;
//! extract_file(
//!     Path::new("photo_watermarked.png"),
//!     Path::new("photo.png"),
//!     &WatermarkSource::Dimensions { width, height },
//!     Path::new("logo_extracted.png"),
//!     &opts,
//! )
//! .unwrap();
//! ```

#![deny(missing_docs)]

pub mod binarize;
pub mod codec;
mod engine;
pub mod error;
mod method;
pub mod sampler;

pub use codec::{embed, embed_dynamic, extract, extract_dynamic, extract_planes};
pub use engine::{
    default_output_path, embed_file, extract_file, is_supported_image, load_carrier,
    load_watermark, save_image, EmbedReport, ExtractReport, ProcessOptions, WatermarkSource,
};
pub use error::{Error, Result};
pub use method::Method;
