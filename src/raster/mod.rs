//! The in-memory raster: header, pixel store and the algorithms that mutate it.

mod draw;
mod filter;
mod header;
mod pixel_buffer;

pub use header::{BitDepth, Header, HEADER_LEN, MAGIC, TERMINATOR};
pub use pixel_buffer::{BufferInfo, PixelBuffer};
