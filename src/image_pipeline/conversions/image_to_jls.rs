use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::config::{ConversionConfig, ReorderPolicy},
    jpegls::{BitstreamEncoder, EncodedArtifact, JpeglsEncoder},
    layout::LayoutValidator,
    orchestrator::EncodeOrchestrator,
    raster::{ChannelOrder, DefaultDecoder, PixelBuffer, RasterDecoder},
    reorder::ChannelReorderer,
};

/// Extension of the files written by [`ImageToJlsPipeline::convert_file`].
pub const OUTPUT_EXTENSION: &str = "jls";

/// Channel order the encoded pixels must have to match the declared RGB
/// color space.
pub const TARGET_CHANNEL_ORDER: ChannelOrder = ChannelOrder::Rgb;

/// `input` with its extension replaced by [`OUTPUT_EXTENSION`].
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

pub struct ImageToJlsPipeline<D: RasterDecoder, E: BitstreamEncoder> {
    decoder: D,
    orchestrator: EncodeOrchestrator<E>,
    config: ConversionConfig,
}

impl ImageToJlsPipeline<DefaultDecoder, JpeglsEncoder> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            decoder: DefaultDecoder::default(),
            orchestrator: EncodeOrchestrator::new(JpeglsEncoder),
            config,
        }
    }
}

impl<D: RasterDecoder, E: BitstreamEncoder> ImageToJlsPipeline<D, E> {
    pub fn with_custom(decoder: D, encoder: E, config: ConversionConfig) -> Self {
        Self {
            decoder,
            orchestrator: EncodeOrchestrator::new(encoder),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    fn should_reorder(&self, buffer: &PixelBuffer) -> bool {
        match self.config.reorder {
            ReorderPolicy::MatchSourceOrder => buffer.channel_order != TARGET_CHANNEL_ORDER,
            ReorderPolicy::Always => true,
            ReorderPolicy::Never => false,
        }
    }

    /// Validates the buffer layout and brings its channels into RGB order.
    ///
    /// Nothing is mutated when validation fails.
    pub fn prepare(&self, buffer: &mut PixelBuffer) -> Result<()> {
        {
            let _span = tracing::info_span!(
                "validate_layout",
                width = buffer.width,
                height = buffer.height,
                stride = buffer.stride
            )
            .entered();
            LayoutValidator::validate(buffer)?;
            if self.config.validate_dimensions {
                self.validate_dimensions(buffer.width, buffer.height)?;
            }
            // The reorder pass indexes rows by stride
            LayoutValidator::validate_geometry(buffer)?;
        }

        if self.should_reorder(buffer) {
            let _span = tracing::info_span!("reorder_channels").entered();
            ChannelReorderer::reorder_to_target_color_order(buffer);
        }

        Ok(())
    }

    /// Prepares and encodes a buffer the caller owns. The buffer is borrowed
    /// exclusively for the duration of the call and returned reordered.
    pub fn encode_buffer(&self, buffer: &mut PixelBuffer) -> Result<EncodedArtifact> {
        self.prepare(buffer)?;

        let _span = tracing::info_span!("encode_jpegls").entered();
        Ok(self.orchestrator.encode(buffer)?)
    }

    /// Decodes `input_data` and encodes it as a JPEG-LS stream in memory.
    ///
    /// This method:
    /// 1. Decodes the container or RAW file into a pixel buffer
    /// 2. Validates the buffer layout (top-down, stride and length)
    /// 3. Reorders the channels to RGB when the policy asks for it
    /// 4. Encodes the frame behind a SPIFF RGB header
    ///
    /// # Arguments
    ///
    /// * `input_data` - Complete bytes of the input image file
    ///
    /// # Returns
    ///
    /// * `Ok(EncodedArtifact)` - The complete `.jls` byte stream
    /// * `Err(ConversionError)` - Decode, layout or codec failure; codec
    ///   errors arrive unchanged inside `ConversionError::Encode`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jls_convert::image_pipeline::{ConversionConfig, ImageToJlsPipeline};
    ///
    /// let pipeline = ImageToJlsPipeline::new(ConversionConfig::default());
    /// let png = std::fs::read("photo.png").unwrap();
    /// let encoded = pipeline.convert(&png).unwrap();
    /// std::fs::write("photo.jls", encoded.as_bytes()).unwrap();
    /// ```
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8]) -> Result<EncodedArtifact> {
        info!("Starting image to JPEG-LS conversion");

        let mut buffer = {
            let _span = tracing::info_span!("decode").entered();
            self.decoder.decode(input_data)?
        };

        let encoded = self.encode_buffer(&mut buffer)?;

        info!(
            width = buffer.width,
            height = buffer.height,
            encoded_size = encoded.len(),
            "Conversion complete"
        );
        Ok(encoded)
    }

    /// Converts `input_path` and writes the result next to it with the
    /// `.jls` extension, replacing any existing file.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written output file
    /// * `Err(ConversionError)` - Nothing was written; see [`Self::convert`]
    pub fn convert_file<P: AsRef<Path>>(&self, input_path: P) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_path = output_path_for(input_path);
        self.convert_file_to(input_path, &output_path)?;
        Ok(output_path)
    }

    /// The output file is only created once encoding has succeeded, and only
    /// replaced once every byte of it has been written.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let encoded = self.convert(&input_data)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            write_artifact(output_path, |file| file.write_all(encoded.as_bytes()))?;
        }

        Ok(())
    }
}

/// Writes through a temporary file in the target's directory that is
/// renamed over `path` once `fill` and the flush succeed.
///
/// # Arguments
///
/// * `path` - Final location of the output file
/// * `fill` - Writes the complete file contents
///
/// # Returns
///
/// * `Ok(())` - `path` holds exactly what `fill` wrote
/// * `Err(ConversionError::OutputWriteError)` - Nothing was created at
///   `path` and any previous file there is unchanged. The temporary file
///   is removed when it is dropped.
pub(crate) fn write_artifact<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let output_error =
        |e: io::Error| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e));

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".jls_convert")
        .suffix(".tmp")
        .tempfile_in(directory)
        .map_err(output_error)?;

    fill(&mut file).map_err(output_error)?;
    file.flush().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;
    Ok(())
}
