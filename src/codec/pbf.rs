//! PBF: the 8 byte header followed by uncompressed pixel data packed for the
//! header's bit depth.
//!
//! | depth | bytes per pixel                    |
//! |-------|------------------------------------|
//! | 1     | 8 pixels per byte, bit 7 = leftmost |
//! | 8     | gray                               |
//! | 16    | gray, alpha                        |
//! | 24    | r, g, b                            |
//! | 32    | r, g, b, a                         |
//!
//! Gray is the integer average (r + g + b) / 3 and reads back as r = g = b.
//! 1-bit pixels are "on" unless r = g = b = 0, and read back as opaque
//! white or black.

use std::fs;
use std::path::Path;

use crate::color::Rgba;
use crate::error::{PixelBufferError, Result};
use crate::raster::{BitDepth, Header, PixelBuffer, HEADER_LEN};

/// Serialize `buffer` to PBF bytes. Invalid buffers are refused.
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let header = *buffer.header();
    let depth = match header.bit_depth {
        Some(depth) if buffer.is_valid() => depth,
        _ => return Err(PixelBufferError::InvalidBuffer),
    };

    let mut out = Vec::with_capacity(HEADER_LEN + header.data_len());
    out.extend_from_slice(&header.to_bytes());

    let pixels = buffer.pixels();
    match depth {
        BitDepth::Mono => {
            out.extend(pixels.chunks_exact(8).map(pack_mono));
        },
        BitDepth::Gray => {
            out.extend(pixels.iter().map(Rgba::gray_level));
        },
        BitDepth::GrayAlpha => {
            for p in pixels {
                out.extend_from_slice(&[p.gray_level(), p.a]);
            }
        },
        BitDepth::Rgb => {
            for p in pixels {
                out.extend_from_slice(&[p.r, p.g, p.b]);
            }
        },
        BitDepth::Rgba => {
            for p in pixels {
                out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
            }
        },
    }

    Ok(out)
}

/// Parse PBF bytes. Bytes past the declared pixel data are ignored.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let header = Header::parse(bytes)?;
    let Some(depth) = header.bit_depth else {
        return Err(PixelBufferError::InvalidBuffer);
    };

    let expected = HEADER_LEN + header.data_len();
    if bytes.len() < expected {
        return Err(PixelBufferError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    let data = &bytes[HEADER_LEN..expected];

    let pixels: Vec<Rgba> = match depth {
        BitDepth::Mono => data.iter().flat_map(|&byte| unpack_mono(byte)).collect(),
        BitDepth::Gray => data.iter().map(|&v| Rgba::gray(v, 255)).collect(),
        BitDepth::GrayAlpha => data.chunks_exact(2).map(|c| Rgba::gray(c[0], c[1])).collect(),
        BitDepth::Rgb => data.chunks_exact(3).map(|c| Rgba::rgb(c[0], c[1], c[2])).collect(),
        BitDepth::Rgba => data
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect(),
    };

    Ok(PixelBuffer::from_parts(header, pixels))
}

/// Pack 8 horizontally adjacent pixels, first pixel in bit 7
fn pack_mono(group: &[Rgba]) -> u8 {
    group
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_on())
        .fold(0u8, |byte, (i, _)| byte | (0x80 >> i))
}

fn unpack_mono(byte: u8) -> [Rgba; 8] {
    std::array::from_fn(|i| {
        if byte & (0x80 >> i) != 0 {
            Rgba::WHITE
        } else {
            Rgba::BLACK
        }
    })
}

impl PixelBuffer {
    pub fn to_pbf_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    pub fn from_pbf_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// Load a `.pbf` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut buffer = Self::default();
        buffer.read(path)?;
        Ok(buffer)
    }

    /// Replace this buffer with the contents of a `.pbf` file. On error the
    /// buffer is left untouched. Returns the file size.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        match decode(&bytes) {
            Ok(buffer) => {
                log::debug!(
                    "read {} ({} bytes, {}x{})",
                    path.display(),
                    bytes.len(),
                    buffer.width(),
                    buffer.height()
                );
                *self = buffer;
                Ok(bytes.len())
            },
            Err(e) => {
                log::warn!("rejecting {}: {}", path.display(), e);
                Err(e)
            },
        }
    }

    /// Encode fully in memory, then write the `.pbf` file. Returns the number
    /// of bytes written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = encode(self)?;
        fs::write(path, &bytes)?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len())
    }
}
