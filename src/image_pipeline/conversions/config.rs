//! Conversion configuration types

use crate::image_pipeline::jpegls::MAX_FRAME_DIMENSION;

/// When the pipeline swaps the first and third channel of each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPolicy {
    /// Swap only when the decoder declared a channel order other than RGB
    MatchSourceOrder,
    /// Always swap, whatever the decoder declared
    Always,
    /// Never swap
    Never,
}

/// Configuration for image to JPEG-LS conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Whether to check dimensions and buffer geometry before touching pixels
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
    /// Channel reorder behaviour
    pub reorder: ReorderPolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: Some(MAX_FRAME_DIMENSION),
            reorder: ReorderPolicy::MatchSourceOrder,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    reorder: Option<ReorderPolicy>,
}

impl ConversionConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn reorder(mut self, policy: ReorderPolicy) -> Self {
        self.reorder = Some(policy);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            reorder: self.reorder.unwrap_or(default.reorder),
        }
    }
}
