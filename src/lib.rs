//! Pixel buffer engine.
//!
//! An in-memory RGBA raster with drawing primitives (lines, rectangles,
//! circles, flood fill), simple filters, and persistence to the compact PBF
//! container (1, 8, 16, 24 or 32 bits per pixel) plus uncompressed TGA.
//!
//! ```no_run
//! use pixelbuffer::{BitDepth, PixelBuffer, Rgba};
//!
//! let mut pb = PixelBuffer::new(64, 32, BitDepth::Rgb, Rgba::BLACK)?;
//! pb.draw_line(0, 0, 63, 31, Rgba::WHITE);
//! pb.fill_circle(32, 16, 8, Rgba::RED);
//! pb.write("frame.pbf")?;
//! # Ok::<(), pixelbuffer::PixelBufferError>(())
//! ```

pub mod codec;
pub mod color;
pub mod error;
pub mod raster;
pub mod util;

pub use color::{Hsva, Rgba};
pub use error::{PixelBufferError, Result};
pub use raster::{BitDepth, BufferInfo, Header, PixelBuffer};
