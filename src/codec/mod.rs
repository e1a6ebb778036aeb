//! File formats: the native PBF container and uncompressed TGA.

pub mod pbf;
pub mod tga;
