use crate::image_pipeline::common::error::EncodeError;
use crate::image_pipeline::jpegls::types::{EncodedArtifact, EncoderConfiguration};

/// A lossless bitstream encoder.
///
/// `pixels` holds `config.height` rows that start `stride` bytes apart;
/// the encoder must not assume the rows are tightly packed.
pub trait BitstreamEncoder {
    fn encode(
        &self,
        config: &EncoderConfiguration,
        pixels: &[u8],
        stride: usize,
    ) -> Result<EncodedArtifact, EncodeError>;
}
