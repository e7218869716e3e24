//! Pipeline conversions module
//!
//! This module contains the orchestration of a full image to JPEG-LS
//! conversion and its configuration.

mod config;
mod image_to_jls;


pub use config::{ConversionConfig, ConversionConfigBuilder, ReorderPolicy};
pub use image_to_jls::{ImageToJlsPipeline, OUTPUT_EXTENSION, TARGET_CHANNEL_ORDER, output_path_for};
