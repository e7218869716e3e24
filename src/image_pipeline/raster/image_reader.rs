//! Raster decoding through the `image` crate.
//!
//! Handles the common container formats (PNG, JPEG, BMP, TIFF, GIF, WebP).
//! The format is guessed from the content, not from a file extension.

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::dib::pack_bgr24;
use crate::image_pipeline::raster::reader::RasterDecoder;
use crate::image_pipeline::raster::types::PixelBuffer;

/// Decoder for common image containers.
///
/// Alpha is dropped and every input is converted to 8 bits per channel.
/// The buffer is handed over in the 24-bit DIB layout (BGR, rows padded
/// to four bytes).
pub struct ImageDecoder;

impl RasterDecoder for ImageDecoder {
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer> {
        debug!("Decoding image, {} bytes", data.len());

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let format = reader.format().ok_or_else(|| {
            ConversionError::DecodeError("unrecognized image container".to_string())
        })?;
        debug!("Detected container format: {:?}", format);

        let decoded = reader
            .decode()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let rgb = decoded.into_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        debug!("Decoded image: {}x{}", width, height);

        pack_bgr24(width, height, rgb.as_raw())
    }
}
