//! Drives a bitstream encoder over a prepared pixel buffer.

use tracing::debug;

use crate::image_pipeline::common::error::EncodeError;
use crate::image_pipeline::jpegls::{
    BitstreamEncoder, EncodedArtifact, EncoderConfiguration, SpiffColorSpace,
};
use crate::image_pipeline::raster::PixelBuffer;

/// Color space declared in the container header of every encoded image.
pub const TARGET_COLOR_SPACE: SpiffColorSpace = SpiffColorSpace::Rgb;

pub struct EncodeOrchestrator<E: BitstreamEncoder> {
    encoder: E,
}

impl<E: BitstreamEncoder> EncodeOrchestrator<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// 8-bit, 3-component, sample-interleaved frame with a standard SPIFF
    /// header declaring [`TARGET_COLOR_SPACE`].
    pub fn configuration_for(buffer: &PixelBuffer) -> EncoderConfiguration {
        EncoderConfiguration::rgb8(buffer.width, buffer.height)
            .with_standard_spiff_header(TARGET_COLOR_SPACE)
    }

    /// Encodes `buffer` in one call, passing its stride through.
    ///
    /// Encoder errors are returned as they are.
    pub fn encode(&self, buffer: &PixelBuffer) -> Result<EncodedArtifact, EncodeError> {
        let config = Self::configuration_for(buffer);
        let stride = usize::try_from(buffer.stride).map_err(|_| EncodeError::InvalidStride {
            stride: buffer.stride,
            row_bytes: buffer.row_bytes(),
        })?;

        debug!(
            width = config.width,
            height = config.height,
            stride,
            "Invoking bitstream encoder"
        );
        self.encoder.encode(&config, &buffer.data, stride)
    }
}
