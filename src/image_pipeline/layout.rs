//! Memory layout checks run before any pixel byte is touched.

use crate::image_pipeline::common::error::LayoutError;
use crate::image_pipeline::raster::PixelBuffer;

pub struct LayoutValidator;

impl LayoutValidator {
    /// Rejects bottom-up buffers (negative stride).
    ///
    /// Row geometry is the decoder's responsibility and is not re-derived
    /// here; see [`LayoutValidator::validate_geometry`] for that.
    pub fn validate(buffer: &PixelBuffer) -> Result<(), LayoutError> {
        if buffer.stride < 0 {
            return Err(LayoutError::UnsupportedScanDirection {
                stride: buffer.stride,
            });
        }
        Ok(())
    }

    /// Checks that every row fits in the stride and every row fits in `data`.
    pub fn validate_geometry(buffer: &PixelBuffer) -> Result<(), LayoutError> {
        Self::validate(buffer)?;

        let row_bytes = buffer.row_bytes();
        if buffer.stride.unsigned_abs() < row_bytes {
            return Err(LayoutError::StrideTooSmall {
                stride: buffer.stride,
                row_bytes,
            });
        }

        let required = buffer.required_len().ok_or(LayoutError::BufferTooSmall {
            len: buffer.data.len(),
            required: usize::MAX,
        })?;
        if buffer.data.len() < required {
            return Err(LayoutError::BufferTooSmall {
                len: buffer.data.len(),
                required,
            });
        }

        Ok(())
    }
}
