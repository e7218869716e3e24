//! JPEG-LS encoding module
//!
//! This module defines the bitstream encoder capability the pipeline drives,
//! its configuration and output types, and a lossless JPEG-LS backend that
//! writes a SPIFF container header.

mod bit_writer;
mod context;
mod encoder;
mod jpegls_encoder;
#[cfg(test)]
mod scan_decoder;
mod scan_encoder;
mod stream_writer;
pub mod types;

pub use encoder::BitstreamEncoder;
pub use jpegls_encoder::{JpeglsEncoder, MAX_FRAME_DIMENSION};
pub use types::{EncodedArtifact, EncoderConfiguration, InterleaveMode, SpiffColorSpace};
