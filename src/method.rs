//! Per-sample LSB encoding and decoding.
//!
//! Every method rewrites only bit 0 of a sample, so a watermarked sample never
//! differs from its carrier by more than one intensity level.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Mask that keeps the upper seven bits of a sample.
const HIGH_BITS: u8 = 0xFE;

/// How a watermark bit is combined with the carrier's least-significant bit.
///
/// Embedding and extraction must be called with the same variant; the codec
/// does not record which one was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// The watermark bit overwrites the carrier LSB.
    #[default]
    Direct,
    /// The carrier LSB is XORed with the watermark bit.
    BitwiseAdd,
    /// Like [`Method::BitwiseAdd`], with the resulting bit inverted.
    NegatedBitwiseAdd,
}

impl Method {
    /// All methods, in numeric-code order.
    pub const ALL: [Method; 3] = [Method::Direct, Method::BitwiseAdd, Method::NegatedBitwiseAdd];

    /// Encode one watermark value into one carrier sample.
    ///
    /// Only `watermark & 1` is used, so both `1` and `255` embed a set bit.
    #[inline]
    #[must_use]
    pub fn embed_bit(self, carrier: u8, watermark: u8) -> u8 {
        let w = watermark & 1;
        let lsb = carrier & 1;
        let bit = match self {
            Method::Direct => w,
            Method::BitwiseAdd => lsb ^ w,
            Method::NegatedBitwiseAdd => !(lsb ^ w) & 1,
        };
        (carrier & HIGH_BITS) | bit
    }

    /// Recover the watermark bit (`0` or `1`) from a watermarked sample and
    /// the matching sample of the original carrier.
    #[inline]
    #[must_use]
    pub fn extract_bit(self, watermarked: u8, carrier: u8) -> u8 {
        let m = watermarked & 1;
        let c = carrier & 1;
        match self {
            Method::Direct => m,
            Method::BitwiseAdd => m ^ c,
            Method::NegatedBitwiseAdd => !(m ^ c) & 1,
        }
    }

    /// Short command-line name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Method::Direct => "direct",
            Method::BitwiseAdd => "bitwise-add",
            Method::NegatedBitwiseAdd => "negated-bitwise-add",
        }
    }

    /// Human-readable label, as shown in a method picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Method::Direct => "Direct replacement",
            Method::BitwiseAdd => "Bitwise addition",
            Method::NegatedBitwiseAdd => "Negated bitwise addition",
        }
    }

    /// Numeric code (1, 2 or 3).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Method::Direct => 1,
            Method::BitwiseAdd => 2,
            Method::NegatedBitwiseAdd => 3,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Accepts the short name or the label, ignoring case; `_` and spaces
    /// are treated as `-`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Method::ALL
            .into_iter()
            .find(|m| {
                normalized == m.name() || normalized == m.label().to_lowercase().replace(' ', "-")
            })
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<u8> for Method {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| Error::UnknownMethod(code.to_string()))
    }
}
