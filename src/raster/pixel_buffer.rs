use std::fmt;

use serde::{Deserialize, Serialize};

use super::header::{BitDepth, Header};
use crate::color::{alpha_blend, Rgba};
use crate::error::{PixelBufferError, Result};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Width x height grid of RGBA pixels plus the header describing how it is
/// persisted.
///
/// Pixels are row-major, index = y * width + x, and always exactly
/// width * height long for a buffer built by [`PixelBuffer::new`] or a
/// successful read. `Default` gives the empty, invalid buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    header: Header,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a `width` x `height` buffer with every pixel set to `fill`.
    ///
    /// 1-bit buffers need a width that is a multiple of 8.
    pub fn new(width: u16, height: u16, bit_depth: BitDepth, fill: Rgba) -> Result<Self> {
        if !bit_depth.fits_width(width) {
            return Err(PixelBufferError::MonoWidth(width));
        }
        Ok(Self::filled(Header::new(width, height, bit_depth), fill))
    }

    /// Fully transparent `width` x `height` buffer at 32 bits per pixel
    pub fn with_size(width: u16, height: u16) -> Self {
        Self::filled(Header::new(width, height, BitDepth::Rgba), Rgba::TRANSPARENT)
    }

    pub(crate) fn filled(header: Header, fill: Rgba) -> Self {
        Self {
            pixels: vec![fill; header.pixel_count()],
            header,
        }
    }

    /// Assemble from decoded parts; `pixels` must match the header size
    pub(crate) fn from_parts(header: Header, pixels: Vec<Rgba>) -> Self {
        debug_assert_eq!(header.pixel_count(), pixels.len());
        Self { header, pixels }
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.header.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.header.height
    }

    #[inline]
    pub fn bit_depth(&self) -> Option<BitDepth> {
        self.header.bit_depth
    }

    /// Change the persisted bit depth. Unsupported values (or 1 bit on a
    /// width that is not a multiple of 8) leave the depth unchanged.
    /// Returns the depth in effect afterwards.
    pub fn set_bit_depth(&mut self, bits: u8) -> Option<BitDepth> {
        match BitDepth::try_from(bits) {
            Ok(depth) if depth.fits_width(self.header.width) => {
                self.header.bit_depth = Some(depth);
            },
            _ => log::warn!("ignoring bit depth {} for {}px wide buffer", bits, self.header.width),
        }
        self.header.bit_depth
    }

    /// Header and pixel data agree and the bit depth is usable
    pub fn is_valid(&self) -> bool {
        match self.header.bit_depth {
            Some(depth) => {
                depth.fits_width(self.header.width)
                    && self.header.pixel_count() == self.pixels.len()
            },
            None => false,
        }
    }

    /// Raw row-major pixels
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.header.width as i32 && y >= 0 && y < self.header.height as i32
    }

    /// Index of (x, y), or None when outside the grid or the pixel data
    #[inline]
    fn pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = y as usize * self.header.width as usize + x as usize;
        (idx < self.pixels.len()).then_some(idx)
    }

    /// Read a pixel. Anything off the grid reads as transparent black.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Rgba {
        self.pixel_index(x, y)
            .map_or(Rgba::TRANSPARENT, |idx| self.pixels[idx])
    }

    /// Store `color` verbatim. Returns false (and does nothing) off the grid.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        match self.pixel_index(x, y) {
            Some(idx) => {
                self.pixels[idx] = color;
                true
            },
            None => false,
        }
    }

    /// Like [`set_pixel`](Self::set_pixel), but a translucent `color` is
    /// composited over the current pixel first.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        match self.pixel_index(x, y) {
            Some(idx) => {
                if color.a < 255 {
                    self.pixels[idx] = alpha_blend(color, self.pixels[idx]);
                } else {
                    self.pixels[idx] = color;
                }
                true
            },
            None => false,
        }
    }

    /// Set every pixel to `color` (no blending)
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Copy the `w` x `h` region at (x, y) into a new buffer. Source pixels
    /// off the grid come out transparent black.
    ///
    /// The copy keeps this buffer's bit depth unless it is 1 bit and `w` is
    /// not a multiple of 8, in which case it is 32 bit.
    pub fn copy(&self, x: i32, y: i32, w: u16, h: u16) -> Self {
        let depth = self
            .header
            .bit_depth
            .filter(|d| d.fits_width(w))
            .unwrap_or(BitDepth::Rgba);

        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for ny in 0..h as i32 {
            for nx in 0..w as i32 {
                pixels.push(self.get_pixel(x.saturating_add(nx), y.saturating_add(ny)));
            }
        }
        Self::from_parts(Header::new(w, h, depth), pixels)
    }

    /// Composite `brush` onto this buffer with its top-left corner at (x, y).
    /// Translucent brush pixels are alpha blended, off-grid pixels skipped.
    pub fn paste(&mut self, brush: &PixelBuffer, x: i32, y: i32) {
        let width = brush.width() as i32;
        let height = brush.height() as i32;
        for by in 0..height {
            for bx in 0..width {
                let color = brush.get_pixel(bx, by);
                self.blend_pixel(x.saturating_add(bx), y.saturating_add(by), color);
            }
        }
    }

    /// Reverse the row order (top row becomes bottom row)
    pub fn flip_rows(&mut self) {
        let width = self.header.width as usize;
        if width == 0 {
            return;
        }
        let rows = self.pixels.len() / width;
        for y in 0..rows / 2 {
            let (top, bottom) = self.pixels.split_at_mut((rows - 1 - y) * width);
            top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }

    /// Size summary of the buffer
    pub fn info(&self) -> BufferInfo {
        BufferInfo {
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.bit_depth.map_or(0, BitDepth::bits),
            pixel_count: self.pixels.len(),
            data_bytes: self.header.data_len(),
        }
    }
}

// ============================================================================
// BufferInfo
// ============================================================================

/// Dimensions and storage size of a buffer, serializable for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferInfo {
    pub width: u16,
    pub height: u16,
    /// 0 when the buffer has no valid depth
    pub bit_depth: u8,
    pub pixel_count: usize,
    /// Encoded pixel data size, header excluded
    pub data_bytes: usize,
}

impl BufferInfo {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BufferInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.data_bytes as f64;
        writeln!(f, "width: {} pixels", self.width)?;
        writeln!(f, "height: {} pixels", self.height)?;
        writeln!(f, "bitdepth: {} b/pixel", self.bit_depth)?;
        writeln!(f, "number of pixels: {}", self.pixel_count)?;
        write!(
            f,
            "memsize of pixels: {} B | {:.2} KiB | {:.2} MiB",
            self.data_bytes,
            bytes / 1024.0,
            bytes / 1024.0 / 1024.0
        )
    }
}
