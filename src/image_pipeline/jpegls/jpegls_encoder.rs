use tracing::debug;

use crate::image_pipeline::common::error::EncodeError;
use crate::image_pipeline::jpegls::encoder::BitstreamEncoder;
use crate::image_pipeline::jpegls::scan_encoder::ScanEncoder;
use crate::image_pipeline::jpegls::stream_writer::JpegStreamWriter;
use crate::image_pipeline::jpegls::types::{EncodedArtifact, EncoderConfiguration, InterleaveMode};

/// Largest width or height a JPEG-LS frame header can carry without an
/// oversize-dimension extension segment.
pub const MAX_FRAME_DIMENSION: usize = u16::MAX as usize;

/// Lossless JPEG-LS (ITU-T T.87) encoder using the default preset
/// coding parameters.
///
/// Supports 8 bits per sample with 3 sample-interleaved components.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpeglsEncoder;

impl JpeglsEncoder {
    fn check_configuration(config: &EncoderConfiguration) -> Result<(u16, u16), EncodeError> {
        let invalid = EncodeError::InvalidDimensions {
            width: config.width,
            height: config.height,
        };
        if config.width == 0 || config.height == 0 {
            return Err(invalid);
        }
        let width = u16::try_from(config.width).map_err(|_| invalid.clone())?;
        let height = u16::try_from(config.height).map_err(|_| invalid)?;

        if config.bits_per_sample != 8 {
            return Err(EncodeError::UnsupportedBitDepth(config.bits_per_sample));
        }
        if config.component_count != 3 {
            return Err(EncodeError::UnsupportedComponentCount(config.component_count));
        }
        if config.interleave_mode != InterleaveMode::Sample {
            return Err(EncodeError::UnsupportedInterleaveMode(config.interleave_mode));
        }

        Ok((width, height))
    }

    fn check_source(
        config: &EncoderConfiguration,
        pixels: &[u8],
        stride: usize,
    ) -> Result<(), EncodeError> {
        let row_bytes = config.width * usize::from(config.component_count);
        if stride < row_bytes {
            return Err(EncodeError::InvalidStride {
                stride: stride as isize,
                row_bytes,
            });
        }

        let required = (config.height - 1)
            .checked_mul(stride)
            .and_then(|bytes| bytes.checked_add(row_bytes))
            .unwrap_or(usize::MAX);
        if pixels.len() < required {
            return Err(EncodeError::BufferTooSmall {
                len: pixels.len(),
                required,
            });
        }
        Ok(())
    }
}

impl BitstreamEncoder for JpeglsEncoder {
    fn encode(
        &self,
        config: &EncoderConfiguration,
        pixels: &[u8],
        stride: usize,
    ) -> Result<EncodedArtifact, EncodeError> {
        let (width, height) = Self::check_configuration(config)?;
        Self::check_source(config, pixels, stride)?;

        debug!(
            "Encoding JPEG-LS frame: {}x{}, {} components, stride={}",
            width, height, config.component_count, stride
        );

        let mut writer = JpegStreamWriter::new(64);
        writer.write_start_of_image();
        if let Some(color_space) = config.spiff_color_space {
            writer.write_standard_spiff_header(
                color_space,
                config.component_count,
                u32::from(height),
                u32::from(width),
                config.bits_per_sample,
            );
            writer.write_spiff_end_of_directory_entry();
        }
        writer.write_start_of_frame(width, height, config.bits_per_sample, config.component_count);
        writer.write_start_of_scan(config.component_count, 0, config.interleave_mode);

        let scan = ScanEncoder::new(config.width, config.height).encode(pixels, config.height, stride);
        writer.write_bytes(&scan);
        writer.write_end_of_image();

        let encoded = writer.into_inner();
        debug!("JPEG-LS encoding complete, {} bytes", encoded.len());
        Ok(EncodedArtifact::new(encoded))
    }
}
