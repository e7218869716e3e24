use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::PixelBuffer;

pub trait RasterDecoder {
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer>;
}
