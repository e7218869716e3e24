//! JPEG-LS encoder configuration and output types

/// How the components of a multi-component image are interleaved in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterleaveMode {
    /// One scan per component.
    None = 0,
    /// Components interleaved line by line.
    Line = 1,
    /// Components of one pixel stored next to each other.
    Sample = 2,
}

/// SPIFF color space identifiers (ITU-T T.84, Annex F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiffColorSpace {
    BiLevelBlack = 0,
    YCbCrItuBt709Video = 1,
    None = 2,
    YCbCrItuBt6011Rgb = 3,
    YCbCrItuBt6011Video = 4,
    Grayscale = 8,
    PhotoYcc = 9,
    Rgb = 10,
    Cmy = 11,
    Cmyk = 12,
    Ycck = 13,
    CieLab = 14,
    BiLevelWhite = 15,
}

/// Geometry and sample format handed to a bitstream encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfiguration {
    pub width: usize,
    pub height: usize,
    pub bits_per_sample: u8,
    pub component_count: u8,
    pub interleave_mode: InterleaveMode,
    /// Color space declared in a standard SPIFF header, `None` writes no header.
    /// Only the header is affected, pixels are never reinterpreted.
    pub spiff_color_space: Option<SpiffColorSpace>,
}

impl EncoderConfiguration {
    /// 8 bits per sample, 3 sample-interleaved components, no SPIFF header.
    pub fn rgb8(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits_per_sample: 8,
            component_count: 3,
            interleave_mode: InterleaveMode::Sample,
            spiff_color_space: None,
        }
    }

    pub fn with_standard_spiff_header(mut self, color_space: SpiffColorSpace) -> Self {
        self.spiff_color_space = Some(color_space);
        self
    }
}

/// Complete encoded bitstream: container header plus compressed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact(Vec<u8>);

impl EncodedArtifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedArtifact {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
