//! Packing of interleaved RGB samples into the 24-bit DIB layout.
//!
//! A top-down 24-bit device-independent bitmap stores pixels as B, G, R
//! with every scanline padded to a multiple of four bytes. The decoders in
//! this crate hand their output over in that layout.

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::types::{BYTES_PER_PIXEL, ChannelOrder, PixelBuffer};

/// Row pitch of a 24-bit DIB.
pub fn dib_stride(width: usize) -> usize {
    (width * BYTES_PER_PIXEL + 3) & !3
}

/// Packs tightly interleaved RGB samples into a top-down BGR buffer with
/// DIB row padding. Padding bytes are zero.
pub fn pack_bgr24(width: usize, height: usize, rgb: &[u8]) -> Result<PixelBuffer> {
    let row_bytes = width * BYTES_PER_PIXEL;
    if rgb.len() != row_bytes * height {
        return Err(ConversionError::DecodeError(format!(
            "expected {} RGB bytes for {}x{}, got {}",
            row_bytes * height,
            width,
            height,
            rgb.len()
        )));
    }

    let stride = dib_stride(width);
    let signed_stride =
        isize::try_from(stride).map_err(|_| ConversionError::InvalidDimensions(width, height))?;
    let mut data = vec![0u8; stride * height];

    if row_bytes > 0 {
        for (dst, src) in data.chunks_exact_mut(stride).zip(rgb.chunks_exact(row_bytes)) {
            for (d, s) in dst[..row_bytes]
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(src.chunks_exact(BYTES_PER_PIXEL))
            {
                d[0] = s[2];
                d[1] = s[1];
                d[2] = s[0];
            }
        }
    }

    Ok(PixelBuffer {
        width,
        height,
        stride: signed_stride,
        channel_order: ChannelOrder::Bgr,
        data,
    })
}
