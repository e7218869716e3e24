use thiserror::Error;

/// Memory layouts the pipeline refuses to process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Image is not top down (stride={stride})")]
    UnsupportedScanDirection { stride: isize },

    #[error("Stride {stride} is smaller than the {row_bytes} bytes of one row")]
    StrideTooSmall { stride: isize, row_bytes: usize },

    #[error("Pixel buffer holds {len} bytes, layout requires {required}")]
    BufferTooSmall { len: usize, required: usize },
}

/// Errors raised by a bitstream encoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Invalid frame dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Unsupported bits per sample: {0}")]
    UnsupportedBitDepth(u8),

    #[error("Unsupported component count: {0}")]
    UnsupportedComponentCount(u8),

    #[error("Unsupported interleave mode: {0:?}")]
    UnsupportedInterleaveMode(crate::image_pipeline::jpegls::InterleaveMode),

    #[error("Invalid stride {stride} for rows of {row_bytes} bytes")]
    InvalidStride { stride: isize, row_bytes: usize },

    #[error("Source buffer holds {len} bytes, encoding requires {required}")]
    BufferTooSmall { len: usize, required: usize },
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Usage: {0} input-image-filename")]
    Usage(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to encode JPEG-LS image: {0}")]
    Encode(#[from] EncodeError),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
