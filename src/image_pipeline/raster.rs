//! Raster decoding module
//!
//! This module describes decoded images in memory and the decoders that
//! produce them.

mod reader;
mod default_reader;
mod image_reader;
mod raw_reader;
pub mod dib;
pub mod types;

pub use reader::RasterDecoder;
pub use default_reader::DefaultDecoder;
pub use image_reader::ImageDecoder;
pub use raw_reader::RawDecoder;
pub use types::{BYTES_PER_PIXEL, ChannelOrder, PixelBuffer};
