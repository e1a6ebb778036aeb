use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{PixelBufferError, Result};

/// `p`, `b`
pub const MAGIC: [u8; 2] = *b"pb";
/// `:`
pub const TERMINATOR: u8 = b':';
/// magic(2) + width(2) + height(2) + bit depth(1) + terminator(1)
pub const HEADER_LEN: usize = 8;

// ============================================================================
// BitDepth
// ============================================================================

/// Bits per pixel used when the buffer is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitDepth {
    /// 8 black/white pixels per byte
    Mono,
    /// One average-gray byte
    Gray,
    /// Gray byte + alpha byte
    GrayAlpha,
    /// r, g, b
    Rgb,
    /// r, g, b, a
    Rgba,
}

impl BitDepth {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Mono => 1,
            Self::Gray => 8,
            Self::GrayAlpha => 16,
            Self::Rgb => 24,
            Self::Rgba => 32,
        }
    }

    /// Encoded size of `pixel_count` pixels (mono rounds up to whole bytes)
    pub const fn data_len(self, pixel_count: usize) -> usize {
        (pixel_count * self.bits() as usize).div_ceil(8)
    }

    /// Whether a buffer of `width` columns can be stored at this depth
    pub const fn fits_width(self, width: u16) -> bool {
        !matches!(self, Self::Mono) || width % 8 == 0
    }

    /// The color `color` comes back as after a write/read at this depth
    pub const fn persisted(self, color: Rgba) -> Rgba {
        match self {
            Self::Mono => {
                if color.is_on() {
                    Rgba::WHITE
                } else {
                    Rgba::BLACK
                }
            },
            Self::Gray => Rgba::gray(color.gray_level(), 255),
            Self::GrayAlpha => Rgba::gray(color.gray_level(), color.a),
            Self::Rgb => Rgba::new(color.r, color.g, color.b, 255),
            Self::Rgba => color,
        }
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = PixelBufferError;

    fn try_from(bits: u8) -> Result<Self> {
        match bits {
            1 => Ok(Self::Mono),
            8 => Ok(Self::Gray),
            16 => Ok(Self::GrayAlpha),
            24 => Ok(Self::Rgb),
            32 => Ok(Self::Rgba),
            other => Err(PixelBufferError::UnsupportedBitDepth(other)),
        }
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

// ============================================================================
// Header
// ============================================================================

/// The 8 byte PBF header. `bit_depth` is `None` only for a default
/// (not yet created or read) buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub bit_depth: Option<BitDepth>,
}

impl Header {
    pub const fn new(width: u16, height: u16, bit_depth: BitDepth) -> Self {
        Self {
            width,
            height,
            bit_depth: Some(bit_depth),
        }
    }

    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of the pixel data that follows the header
    pub const fn data_len(&self) -> usize {
        match self.bit_depth {
            Some(depth) => depth.data_len(self.pixel_count()),
            None => 0,
        }
    }

    /// Field-by-field little-endian encoding
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        let bits = self.bit_depth.map_or(0, BitDepth::bits);
        [MAGIC[0], MAGIC[1], w0, w1, h0, h1, bits, TERMINATOR]
    }

    /// Decode and validate the first [`HEADER_LEN`] bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(PixelBufferError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0..2] != MAGIC {
            return Err(PixelBufferError::BadMagic(bytes[0], bytes[1]));
        }
        if bytes[7] != TERMINATOR {
            return Err(PixelBufferError::BadTerminator(bytes[7]));
        }

        let width = u16::from_le_bytes([bytes[2], bytes[3]]);
        let height = u16::from_le_bytes([bytes[4], bytes[5]]);
        let depth = BitDepth::try_from(bytes[6])?;
        if !depth.fits_width(width) {
            return Err(PixelBufferError::MonoWidth(width));
        }

        Ok(Self::new(width, height, depth))
    }
}
