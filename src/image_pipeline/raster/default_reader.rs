use image::ImageFormat;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::image_reader::ImageDecoder;
use crate::image_pipeline::raster::raw_reader::RawDecoder;
use crate::image_pipeline::raster::reader::RasterDecoder;
use crate::image_pipeline::raster::types::PixelBuffer;

/// Decoder that picks a backend by sniffing the content.
///
/// Most camera RAW formats are TIFF containers, so TIFF-looking or
/// unrecognised input is tried as RAW first and falls back to the
/// `image` crate. Everything else goes straight to `image`.
pub struct DefaultDecoder {
    image: ImageDecoder,
    raw: RawDecoder,
}

impl Default for DefaultDecoder {
    fn default() -> Self {
        Self {
            image: ImageDecoder,
            raw: RawDecoder,
        }
    }
}

/// Whether `data` should be offered to the RAW decoder before `image`.
fn may_be_camera_raw(data: &[u8]) -> bool {
    !matches!(image::guess_format(data), Ok(format) if format != ImageFormat::Tiff)
}

impl RasterDecoder for DefaultDecoder {
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer> {
        if !may_be_camera_raw(data) {
            return self.image.decode(data);
        }

        self.raw.decode(data).or_else(|raw_err| {
            debug!("Not a camera RAW file ({}), trying image containers", raw_err);
            self.image.decode(data)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgb, RgbImage};

    use super::*;
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::raster::types::ChannelOrder;

    fn two_pixel_image() -> RgbImage {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([10, 20, 30]));
        image.put_pixel(1, 0, Rgb([40, 50, 60]));
        image
    }

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_routing_by_content() {
        let image = two_pixel_image();
        assert!(!may_be_camera_raw(&encode(&image, ImageFormat::Png)));
        assert!(!may_be_camera_raw(&encode(&image, ImageFormat::Bmp)));
        assert!(may_be_camera_raw(&encode(&image, ImageFormat::Tiff)));
        assert!(may_be_camera_raw(b"no known magic bytes"));
    }

    #[test]
    fn test_png_decodes_into_bgr_dib_layout() {
        let buffer = DefaultDecoder::default()
            .decode(&encode(&two_pixel_image(), ImageFormat::Png))
            .unwrap();

        assert_eq!(buffer.channel_order, ChannelOrder::Bgr);
        assert_eq!(buffer.stride, 8);
        assert_eq!(buffer.data, vec![30, 20, 10, 60, 50, 40, 0, 0]);
    }

    #[test]
    fn test_plain_tiff_falls_back_to_image_decoder() {
        let tiff = encode(&two_pixel_image(), ImageFormat::Tiff);
        assert!(RawDecoder.decode(&tiff).is_err());

        let buffer = DefaultDecoder::default().decode(&tiff).unwrap();

        assert_eq!((buffer.width, buffer.height), (2, 1));
        assert_eq!(buffer.channel_order, ChannelOrder::Bgr);
        assert_eq!(buffer.data, vec![30, 20, 10, 60, 50, 40, 0, 0]);
    }

    #[test]
    fn test_unrecognised_content_fails_after_both_decoders() {
        let result = DefaultDecoder::default().decode(b"no known magic bytes");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
