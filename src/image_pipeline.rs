//! Image processing pipeline module
//!
//! This module converts decoded raster images into lossless JPEG-LS
//! bitstreams, with separate modules for decoding, layout validation,
//! channel reordering, JPEG-LS encoding and conversion orchestration.

pub mod common;
pub mod conversions;
pub mod jpegls;
pub mod layout;
pub mod orchestrator;
pub mod raster;
pub mod reorder;

pub use common::{
    ConversionError,
    EncodeError,
    LayoutError,
    Result,
};

pub use raster::{
    ChannelOrder,
    DefaultDecoder,
    ImageDecoder,
    PixelBuffer,
    RasterDecoder,
    RawDecoder,
};

pub use jpegls::{
    BitstreamEncoder,
    EncodedArtifact,
    EncoderConfiguration,
    InterleaveMode,
    JpeglsEncoder,
    SpiffColorSpace,
};

pub use layout::LayoutValidator;
pub use reorder::ChannelReorderer;
pub use orchestrator::EncodeOrchestrator;

pub use conversions::{
    ConversionConfig,
    ConversionConfigBuilder,
    ImageToJlsPipeline,
    ReorderPolicy,
};
