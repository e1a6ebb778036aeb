//! Uncompressed TGA import/export.
//!
//! Reads datatype 2 (true-color) and 3 (grayscale) images at 8, 24 or 32
//! bits per pixel; anything run-length encoded or color mapped is refused.
//! Pixel data is stored B, G, R[, A] and bottom-up unless bit 5 of the image
//! descriptor is set. Buffers always come out top-down RGBA.
//!
//! Writes datatype 2, top-left origin, 24 bits (buffers stored at 1, 8 or 24
//! bits) or 32 bits (16 or 32 bits). Each pixel is written as it would come
//! back from a PBF read at the buffer's own depth, so gray and 1-bit buffers
//! export their gray/black-and-white look.

use std::fs;
use std::path::Path;

use crate::color::Rgba;
use crate::error::{PixelBufferError, Result};
use crate::raster::{BitDepth, Header, PixelBuffer};
use crate::util::{high_byte, low_byte, make_word};

pub const TGA_HEADER_LEN: usize = 18;

const TYPE_TRUE_COLOR: u8 = 2;
const TYPE_GRAYSCALE: u8 = 3;
/// Image descriptor bit 5: first row is the top row
const ORIGIN_TOP: u8 = 0x20;

/// Parse an uncompressed TGA image
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.len() < TGA_HEADER_LEN {
        return Err(PixelBufferError::Truncated {
            expected: TGA_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let id_len = bytes[0] as usize;
    let color_map_type = bytes[1];
    let datatype = bytes[2];
    let color_map_len = make_word(bytes[6], bytes[5]) as usize;
    let color_map_depth = bytes[7] as usize;
    let width = make_word(bytes[13], bytes[12]);
    let height = make_word(bytes[15], bytes[14]);
    let bits = bytes[16];
    let descriptor = bytes[17];

    if datatype != TYPE_TRUE_COLOR && datatype != TYPE_GRAYSCALE {
        return Err(PixelBufferError::UnsupportedTgaType(datatype));
    }
    let depth = match bits {
        8 => BitDepth::Gray,
        24 => BitDepth::Rgb,
        32 => BitDepth::Rgba,
        other => return Err(PixelBufferError::UnsupportedTgaDepth(other)),
    };

    // Image ID and an (unused) color map sit between header and pixels
    let mut start = TGA_HEADER_LEN + id_len;
    if color_map_type == 1 {
        start += color_map_len * color_map_depth.div_ceil(8);
    }

    let header = Header::new(width, height, depth);
    let bytes_per_pixel = bits as usize / 8;
    let expected = start + header.pixel_count() * bytes_per_pixel;
    if bytes.len() < expected {
        return Err(PixelBufferError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let pixels = bytes[start..expected]
        .chunks_exact(bytes_per_pixel)
        .map(|c| match *c {
            [v] => Rgba::gray(v, 255),
            [b, g, r] => Rgba::rgb(r, g, b),
            _ => Rgba::new(c[2], c[1], c[0], c[3]),
        })
        .collect();

    let mut buffer = PixelBuffer::from_parts(header, pixels);
    if descriptor & ORIGIN_TOP == 0 {
        buffer.flip_rows();
    }
    Ok(buffer)
}

/// Serialize `buffer` as an uncompressed, top-left origin TGA image
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let depth = match buffer.bit_depth() {
        Some(depth) if buffer.is_valid() => depth,
        _ => return Err(PixelBufferError::InvalidBuffer),
    };
    let with_alpha = matches!(depth, BitDepth::GrayAlpha | BitDepth::Rgba);
    let (bits, alpha_bits) = if with_alpha { (32u8, 8u8) } else { (24, 0) };

    let (width, height) = (buffer.width(), buffer.height());
    let mut out = Vec::with_capacity(TGA_HEADER_LEN + buffer.pixels().len() * bits as usize / 8);
    out.extend_from_slice(&[0, 0, TYPE_TRUE_COLOR, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&[low_byte(width), high_byte(width)]);
    out.extend_from_slice(&[low_byte(height), high_byte(height)]);
    out.extend_from_slice(&[bits, ORIGIN_TOP | alpha_bits]);

    for &pixel in buffer.pixels() {
        let c = depth.persisted(pixel);
        if with_alpha {
            out.extend_from_slice(&[c.b, c.g, c.r, c.a]);
        } else {
            out.extend_from_slice(&[c.b, c.g, c.r]);
        }
    }

    Ok(out)
}

impl PixelBuffer {
    pub fn to_tga_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    pub fn from_tga_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// Replace this buffer with a `.tga` file's image. On error the buffer is
    /// left untouched. Returns the file size.
    pub fn read_tga(&mut self, path: impl AsRef<Path>) -> Result<usize> {
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

    /// Encode fully in memory, then write the `.tga` file. Returns the number
    /// of bytes written.
    pub fn write_tga(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = encode(self)?;
        fs::write(path, &bytes)?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn tga_header(datatype: u8, width: u16, height: u16, bits: u8, descriptor: u8) -> Vec<u8> {
        let mut h = vec![0u8; TGA_HEADER_LEN];
        h[2] = datatype;
        h[12..14].copy_from_slice(&width.to_le_bytes());
        h[14..16].copy_from_slice(&height.to_le_bytes());
        h[16] = bits;
        h[17] = descriptor;
        h
    }

    #[test]
    fn test_bottom_origin_is_flipped() {
        // 2x3, bottom-left origin: first stored row is the bottom row
        let mut bytes = tga_header(2, 2, 3, 24, 0);
        bytes.extend_from_slice(&[0, 0, 255, 0, 0, 0]); // red, black
        bytes.extend_from_slice(&[0; 6]);
        bytes.extend_from_slice(&[255, 0, 0, 0, 0, 0]); // blue, black

        let pb = decode(&bytes).unwrap();
        assert_eq!(pb.width(), 2);
        assert_eq!(pb.height(), 3);
        assert_eq!(pb.bit_depth(), Some(BitDepth::Rgb));
        assert_eq!(pb.get_pixel(0, 2), Rgba::RED);
        assert_eq!(pb.get_pixel(0, 0), Rgba::BLUE);
        assert_eq!(pb.get_pixel(1, 2), Rgba::BLACK);
    }

    #[test]
    fn test_top_origin_kept() {
        let mut bytes = tga_header(2, 1, 2, 32, ORIGIN_TOP | 8);
        bytes.extend_from_slice(&[10, 20, 30, 40, 50, 60, 70, 80]);

        let pb = decode(&bytes).unwrap();
        assert_eq!(pb.get_pixel(0, 0), Rgba::new(30, 20, 10, 40));
        assert_eq!(pb.get_pixel(0, 1), Rgba::new(70, 60, 50, 80));
    }

    #[test]
    fn test_grayscale_and_image_id() {
        let mut bytes = tga_header(3, 2, 1, 8, ORIGIN_TOP);
        bytes[0] = 3;
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&[7, 200]);

        let pb = decode(&bytes).unwrap();
        assert_eq!(pb.bit_depth(), Some(BitDepth::Gray));
        assert_eq!(pb.get_pixel(0, 0), Rgba::gray(7, 255));
        assert_eq!(pb.get_pixel(1, 0), Rgba::gray(200, 255));
    }

    #[test]
    fn test_rejects_compressed_and_odd_depths() {
        let mut bytes = tga_header(10, 1, 1, 24, 0);
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(decode(&bytes), Err(PixelBufferError::UnsupportedTgaType(10))));

        let bytes = tga_header(1, 1, 1, 8, 0);
        assert!(matches!(decode(&bytes), Err(PixelBufferError::UnsupportedTgaType(1))));

        let mut bytes = tga_header(2, 1, 1, 16, 0);
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(decode(&bytes), Err(PixelBufferError::UnsupportedTgaDepth(16))));
    }

    #[test]
    fn test_rejects_truncated() {
        let mut bytes = tga_header(2, 2, 2, 24, 0);
        bytes.extend_from_slice(&[0; 11]);
        assert!(matches!(
            decode(&bytes),
            Err(PixelBufferError::Truncated { expected: 30, actual: 29 })
        ));
        assert!(matches!(decode(&bytes[..10]), Err(PixelBufferError::Truncated { .. })));
    }

    #[test]
    fn test_encode_header() {
        let pb = PixelBuffer::new(300, 2, BitDepth::Rgba, Rgba::TRANSPARENT).unwrap();
        let bytes = encode(&pb).unwrap();
        assert_eq!(bytes[2], 2);
        assert_eq!(&bytes[12..16], &[0x2C, 0x01, 2, 0]);
        assert_eq!(bytes[16], 32);
        assert_eq!(bytes[17], 0x28);
        assert_eq!(bytes.len(), 18 + 300 * 2 * 4);
    }

    #[test]
    fn test_encode_depth_promotion() {
        let cases = [
            (BitDepth::Mono, 24),
            (BitDepth::Gray, 24),
            (BitDepth::GrayAlpha, 32),
            (BitDepth::Rgb, 24),
            (BitDepth::Rgba, 32),
        ];
        for (depth, bits) in cases {
            let pb = PixelBuffer::new(8, 1, depth, Rgba::WHITE).unwrap();
            let bytes = encode(&pb).unwrap();
            assert_eq!(bytes[16], bits, "depth {:?}", depth);
            assert_eq!(bytes.len(), 18 + 8 * bits as usize / 8);
        }
    }

    #[test]
    fn test_encode_bgr_order_and_gray_expansion() {
        let mut pb = PixelBuffer::new(2, 1, BitDepth::Rgb, Rgba::TRANSPARENT).unwrap();
        pb.set_pixel(0, 0, Rgba::new(1, 2, 3, 9));
        let bytes = encode(&pb).unwrap();
        assert_eq!(&bytes[18..21], &[3, 2, 1]);

        let mut pb = PixelBuffer::new(1, 1, BitDepth::GrayAlpha, Rgba::TRANSPARENT).unwrap();
        pb.set_pixel(0, 0, Rgba::new(30, 60, 90, 40));
        let bytes = encode(&pb).unwrap();
        assert_eq!(&bytes[18..], &[60, 60, 60, 40]);
    }

    #[test]
    fn test_round_trip_through_tga() {
        let mut pb = PixelBuffer::new(4, 3, BitDepth::Rgba, Rgba::TRANSPARENT).unwrap();
        pb.set_pixel(0, 0, Rgba::new(255, 0, 0, 255));
        pb.set_pixel(3, 2, Rgba::new(1, 2, 3, 4));
        pb.set_pixel(2, 1, Rgba::new(9, 8, 7, 6));

        let back = decode(&encode(&pb).unwrap()).unwrap();
        assert_eq!(back, pb);
    }

    #[test]
    fn test_file_round_trip_and_failed_read() {
        let pb = PixelBuffer::new(3, 3, BitDepth::Rgb, Rgba::ORANGE).unwrap();
        let temp_file = NamedTempFile::with_suffix(".tga").unwrap();
        assert_eq!(pb.write_tga(temp_file.path()).unwrap(), 18 + 27);

        let mut loaded = PixelBuffer::default();
        assert_eq!(loaded.read_tga(temp_file.path()).unwrap(), 18 + 27);
        assert_eq!(loaded, pb);

        fs::write(temp_file.path(), tga_header(9, 1, 1, 24, 0)).unwrap();
        assert!(loaded.read_tga(temp_file.path()).is_err());
        assert_eq!(loaded, pb);
    }
}
