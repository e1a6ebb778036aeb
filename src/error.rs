//! Error types for pixel buffer construction and the PBF/TGA codecs.

/// Errors surfaced by buffer construction and file/format operations.
///
/// Out-of-range pixel coordinates are not errors; see `PixelBuffer::get_pixel`.
#[derive(Debug, thiserror::Error)]
pub enum PixelBufferError {
    /// The first two bytes are not `pb`.
    #[error("bad magic bytes: {0:#04x} {1:#04x}")]
    BadMagic(u8, u8),

    /// The header does not end with `:`.
    #[error("bad header terminator: {0:#04x}")]
    BadTerminator(u8),

    /// Bit depth outside {1, 8, 16, 24, 32}.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u8),

    /// 1-bit buffers pack 8 pixels of a row per byte.
    #[error("width {0} is not a multiple of 8, required for 1-bit buffers")]
    MonoWidth(u16),

    /// The stream ended before the header or pixel data was complete.
    #[error("truncated data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// TGA datatype other than uncompressed true-color (2) or grayscale (3).
    #[error("unsupported TGA datatype: {0}")]
    UnsupportedTgaType(u8),

    /// TGA pixel depth other than 8, 24 or 32.
    #[error("unsupported TGA bit depth: {0}")]
    UnsupportedTgaDepth(u8),

    /// Refusing to encode a buffer whose header and pixels disagree.
    #[error("pixel buffer is not valid")]
    InvalidBuffer,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PixelBufferError>;
