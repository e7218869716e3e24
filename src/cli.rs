//! Command line surface: one positional input path.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use crate::image_pipeline::{ConversionConfig, ConversionError, ImageToJlsPipeline, Result};

pub const BINARY_NAME: &str = "jls_convert";

/// Convert an image (PNG, JPEG, BMP, TIFF, GIF, WebP or camera RAW) to a
/// lossless JPEG-LS file next to it.
#[derive(Parser, Debug)]
#[command(name = BINARY_NAME, version)]
pub struct Args {
    /// Path of the image to convert
    #[arg(allow_hyphen_values = true)]
    pub input: PathBuf,
}

/// Outcome of argument parsing that is not a conversion request.
#[derive(Debug)]
pub enum ParseOutcome {
    Convert(Args),
    /// `--help` or `--version` was requested; the text is ready to print
    Informational(String),
}

pub fn parse_args<I, T>(args: I) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => Ok(ParseOutcome::Convert(args)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(ParseOutcome::Informational(e.to_string()))
        }
        Err(_) => Err(ConversionError::Usage(BINARY_NAME.to_string())),
    }
}

/// Converts the input named by `args` and returns the written output path.
pub fn run(args: &Args) -> Result<PathBuf> {
    let pipeline = ImageToJlsPipeline::new(ConversionConfig::default());
    pipeline.convert_file(&args.input)
}
