//! Camera RAW decoding using the rawloader library.
//!
//! This module supports the RAW formats rawloader can read (ARW, CR2, NEF,
//! DNG, RAF, ...). Sensor data is demosaiced on the CPU with the `bayer`
//! crate, then run through a colour pipeline:
//! black level -> white balance -> colour matrix (camera -> XYZ -> sRGB),
//! cropped to the image area the camera reports and gamma-encoded down to
//! 8 bits per channel.

use std::io::Cursor;

use anyhow::Context;
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rawloader::{RawImage, RawImageData as RawloaderImageData};
use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::dib::pack_bgr24;
use crate::image_pipeline::raster::reader::RasterDecoder;
use crate::image_pipeline::raster::types::{BYTES_PER_PIXEL, PixelBuffer};

/// RAW decoder producing 8-bit pixels in the 24-bit DIB layout.
pub struct RawDecoder;

/// Display gamma applied after colour correction.
const OUTPUT_GAMMA: f32 = 1.0 / 2.2;

/// XYZ to linear sRGB, D65 white point.
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl RasterDecoder for RawDecoder {
    /// Decodes a camera RAW file into display-referred 8-bit BGR pixels.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes of the RAW image file
    ///
    /// # Returns
    ///
    /// * `Ok(PixelBuffer)` - Cropped, colour-corrected image in DIB layout
    /// * `Err(ConversionError::DecodeError)` - rawloader could not read the
    ///   file, or its sensor layout is not supported
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jls_convert::image_pipeline::{RasterDecoder, RawDecoder};
    ///
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let buffer = RawDecoder.decode(&raw_bytes).unwrap();
    /// ```
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        debug!(
            "Decoded RAW {} {}: {}x{}, cpp={}, cfa={}, crops={:?}",
            decoded.make, decoded.model, width, height, decoded.cpp, decoded.cfa.name, decoded.crops
        );

        let correction = ColorCorrection::for_image(&decoded);

        // Float data is normalised 0.0-1.0, scale it to the u16 range
        let samples: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.clone(),
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                .collect(),
        };

        let linear = match decoded.cpp {
            1 => demosaic(&samples, width, height, cfa_from_name(&decoded.cfa.name))
                .map_err(|e| ConversionError::DecodeError(format!("{e:#}")))?,
            3 => samples,
            cpp => {
                return Err(ConversionError::DecodeError(format!(
                    "unsupported RAW layout with {cpp} components per pixel"
                )));
            }
        };

        let (linear, width, height) = crop(linear, width, height, decoded.crops);
        let rgb = correction.to_display_rgb8(&linear);

        pack_bgr24(width, height, &rgb)
    }
}

fn cfa_from_name(name: &str) -> CFA {
    match name {
        "BGGR" => CFA::BGGR,
        "GBRG" => CFA::GBRG,
        "GRBG" => CFA::GRBG,
        _ => CFA::RGGB,
    }
}

/// Bilinear demosaic of a single-channel 16-bit mosaic into interleaved RGB.
fn demosaic(samples: &[u16], width: usize, height: usize, cfa: CFA) -> anyhow::Result<Vec<u16>> {
    info!("Running CPU demosaic for image {}x{}", width, height);

    let bayer_bytes: Vec<u8> = samples.iter().flat_map(|&v| v.to_le_bytes()).collect();
    let mut output_buf = vec![0u8; width * height * BYTES_PER_PIXEL * 2];

    {
        let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut Cursor::new(&bayer_bytes[..]),
            BayerDepth::Depth16LE,
            cfa,
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))
        .context("demosaic failed")?;
    }

    Ok(output_buf
        .chunks_exact(2)
        .map(|b| u16::from_ne_bytes([b[0], b[1]]))
        .collect())
}

/// Cuts interleaved RGB down to the area inside `crops`
/// (top, right, bottom, left). Crops that leave no pixels are ignored.
fn crop(rgb: Vec<u16>, width: usize, height: usize, crops: [usize; 4]) -> (Vec<u16>, usize, usize) {
    let [top, right, bottom, left] = crops;
    if crops == [0; 4] || top + bottom >= height || left + right >= width {
        return (rgb, width, height);
    }

    let cropped_width = width - left - right;
    let cropped_height = height - top - bottom;
    let row = width * BYTES_PER_PIXEL;
    let cropped = rgb
        .chunks_exact(row)
        .skip(top)
        .take(cropped_height)
        .flat_map(|line| &line[left * BYTES_PER_PIXEL..(left + cropped_width) * BYTES_PER_PIXEL])
        .copied()
        .collect();

    (cropped, cropped_width, cropped_height)
}

/// Per-file sensor to display transform.
#[derive(Debug, Clone, PartialEq)]
struct ColorCorrection {
    black: f32,
    range: f32,
    white_balance: [f32; 3],
    cam_to_srgb: [[f32; 3]; 3],
}

impl ColorCorrection {
    fn for_image(image: &RawImage) -> Self {
        let black = f32::from(image.blacklevels[0]);
        let white = f32::from(image.whitelevels[0]);
        Self {
            black,
            range: (white - black).max(1.0),
            white_balance: white_balance(image.wb_coeffs),
            cam_to_srgb: camera_to_srgb(&image.cam_to_xyz()),
        }
    }

    /// Linear sRGB in `0.0..=1.0` for one demosaiced camera pixel.
    fn apply(&self, pixel: [u16; 3]) -> [f32; 3] {
        let camera: [f32; 3] = std::array::from_fn(|c| {
            ((f32::from(pixel[c]) - self.black).max(0.0) / self.range) * self.white_balance[c]
        });
        std::array::from_fn(|r| {
            let row = &self.cam_to_srgb[r];
            (row[0] * camera[0] + row[1] * camera[1] + row[2] * camera[2]).clamp(0.0, 1.0)
        })
    }

    fn to_display_rgb8(&self, linear: &[u16]) -> Vec<u8> {
        linear
            .chunks_exact(BYTES_PER_PIXEL)
            .flat_map(|pixel| self.apply([pixel[0], pixel[1], pixel[2]]))
            .map(|v| (v.powf(OUTPUT_GAMMA) * 255.0).round() as u8)
            .collect()
    }
}

/// Red and blue gains relative to green. Missing coefficients (rawloader
/// reports NaN for cameras without white balance data) count as 1.
fn white_balance(coeffs: [f32; 4]) -> [f32; 3] {
    let green = coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0; 3];
    }
    let relative = |c: f32| if c.is_finite() && c > 0.0 { c / green } else { 1.0 };
    [relative(coeffs[0]), 1.0, relative(coeffs[2])]
}

/// Combines the camera's matrix with XYZ -> sRGB. Rows are normalised to
/// sum to 1 so a white-balanced neutral stays neutral; a degenerate matrix
/// falls back to identity.
fn camera_to_srgb(cam_to_xyz: &[[f32; 4]; 3]) -> [[f32; 3]; 3] {
    let mut matrix: [[f32; 3]; 3] = std::array::from_fn(|r| {
        std::array::from_fn(|c| (0..3).map(|k| XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c]).sum())
    });

    for row in &mut matrix {
        let sum: f32 = row.iter().sum();
        if !sum.is_finite() || sum.abs() < f32::EPSILON {
            return IDENTITY;
        }
        row.iter_mut().for_each(|v| *v /= sum);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    /// sRGB -> XYZ (D65), the inverse of `XYZ_TO_SRGB`.
    const SRGB_TO_XYZ: [[f32; 4]; 3] = [
        [0.4124564, 0.3575761, 0.1804375, 0.0],
        [0.2126729, 0.7151522, 0.0721750, 0.0],
        [0.0193339, 0.1191920, 0.9503041, 0.0],
    ];

    fn neutral_correction(black: f32, white: f32) -> ColorCorrection {
        ColorCorrection {
            black,
            range: white - black,
            white_balance: [1.0; 3],
            cam_to_srgb: IDENTITY,
        }
    }

    #[test]
    fn test_cfa_names_map_to_patterns() {
        assert!(matches!(cfa_from_name("BGGR"), CFA::BGGR));
        assert!(matches!(cfa_from_name("GRBG"), CFA::GRBG));
        assert!(matches!(cfa_from_name("GBRG"), CFA::GBRG));
        assert!(matches!(cfa_from_name("RGGB"), CFA::RGGB));
        assert!(matches!(cfa_from_name("XTRANS"), CFA::RGGB));
    }

    #[test]
    fn test_display_conversion_clamps_levels() {
        let correction = neutral_correction(512.0, 4095.0);
        let rgb = correction.to_display_rgb8(&[0, 512, 4095, 8000, 8000, 8000]);
        assert_eq!(rgb, vec![0, 0, 255, 255, 255, 255]);
    }

    #[test]
    fn test_white_balance_scales_red_and_blue() {
        assert_eq!(white_balance([2.0, 1.0, 1.5, f32::NAN]), [2.0, 1.0, 1.5]);
        assert_eq!(white_balance([4.0, 2.0, 3.0, 2.0]), [2.0, 1.0, 1.5]);
    }

    #[test]
    fn test_missing_white_balance_is_neutral() {
        assert_eq!(white_balance([f32::NAN; 4]), [1.0; 3]);
        assert_eq!(white_balance([2.0, 0.0, 1.5, 0.0]), [1.0; 3]);
        assert_eq!(white_balance([f32::NAN, 1.0, 1.5, 0.0]), [1.0, 1.0, 1.5]);
    }

    #[test]
    fn test_srgb_camera_matrix_is_identity() {
        let matrix = camera_to_srgb(&SRGB_TO_XYZ);
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!((matrix[r][c] - expected).abs() < 1e-3, "{matrix:?}");
            }
        }
    }

    #[test]
    fn test_degenerate_camera_matrix_falls_back_to_identity() {
        assert_eq!(camera_to_srgb(&[[0.0; 4]; 3]), IDENTITY);
        assert_eq!(camera_to_srgb(&[[f32::NAN; 4]; 3]), IDENTITY);
    }

    #[test]
    fn test_balanced_neutral_stays_neutral() {
        let mut correction = neutral_correction(0.0, 1000.0);
        correction.white_balance = [2.0, 1.0, 1.25];
        correction.cam_to_srgb = camera_to_srgb(&[
            [0.6, 0.3, 0.1, 0.0],
            [0.2, 0.7, 0.1, 0.0],
            [0.0, 0.1, 0.9, 0.0],
        ]);

        // Grey as seen by a sensor that needs the gains above
        let [r, g, b] = correction.apply([250, 500, 400]);

        assert!((r - g).abs() < 1e-4 && (g - b).abs() < 1e-4, "{r} {g} {b}");
        assert!((g - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_crop_keeps_inner_area() {
        // 4x3 image, sample value encodes (row, column)
        let rgb: Vec<u16> = (0..3u16)
            .flat_map(|y| (0..4u16).flat_map(move |x| [y * 10 + x; 3]))
            .collect();

        let (cropped, width, height) = crop(rgb, 4, 3, [1, 1, 0, 1]);

        assert_eq!((width, height), (2, 2));
        let firsts: Vec<u16> = cropped.chunks_exact(3).map(|p| p[0]).collect();
        assert_eq!(firsts, vec![11, 12, 21, 22]);
    }

    #[test]
    fn test_crop_ignored_when_empty_or_oversized() {
        let rgb = vec![1u16; 2 * 2 * 3];
        assert_eq!(crop(rgb.clone(), 2, 2, [0; 4]), (rgb.clone(), 2, 2));
        assert_eq!(crop(rgb.clone(), 2, 2, [1, 0, 1, 0]), (rgb, 2, 2));
    }

    #[test]
    fn test_decode_non_raw_fails() {
        let result = RawDecoder.decode(b"not a camera file");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
