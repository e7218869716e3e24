//! JPEG-LS marker segments and the SPIFF container header.

use crate::image_pipeline::jpegls::types::{InterleaveMode, SpiffColorSpace};

const START_OF_IMAGE: u8 = 0xD8;
const END_OF_IMAGE: u8 = 0xD9;
const START_OF_SCAN: u8 = 0xDA;
const APPLICATION_DATA8: u8 = 0xE8;
const START_OF_FRAME_JPEGLS: u8 = 0xF7;

const SPIFF_MAGIC: &[u8; 6] = b"SPIFF\0";
const SPIFF_MAJOR_REVISION: u8 = 2;
const SPIFF_MINOR_REVISION: u8 = 0;
const SPIFF_PROFILE_NONE: u8 = 0;
const SPIFF_COMPRESSION_JPEG_LS: u8 = 6;
const SPIFF_RESOLUTION_ASPECT_RATIO: u8 = 0;
const SPIFF_END_OF_DIRECTORY: u32 = 1;

pub(crate) struct JpegStreamWriter {
    out: Vec<u8>,
}

impl JpegStreamWriter {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn write_start_of_image(&mut self) {
        self.write_marker(START_OF_IMAGE);
    }

    pub(crate) fn write_end_of_image(&mut self) {
        self.write_marker(END_OF_IMAGE);
    }

    /// SPIFF header with the defaults of a standard header: no profile,
    /// JPEG-LS compression, 1:1 aspect ratio.
    pub(crate) fn write_standard_spiff_header(
        &mut self,
        color_space: SpiffColorSpace,
        component_count: u8,
        height: u32,
        width: u32,
        bits_per_sample: u8,
    ) {
        self.write_segment_header(APPLICATION_DATA8, 30);
        self.out.extend_from_slice(SPIFF_MAGIC);
        self.out.push(SPIFF_MAJOR_REVISION);
        self.out.push(SPIFF_MINOR_REVISION);
        self.out.push(SPIFF_PROFILE_NONE);
        self.out.push(component_count);
        self.write_u32(height);
        self.write_u32(width);
        self.out.push(color_space as u8);
        self.out.push(bits_per_sample);
        self.out.push(SPIFF_COMPRESSION_JPEG_LS);
        self.out.push(SPIFF_RESOLUTION_ASPECT_RATIO);
        self.write_u32(1);
        self.write_u32(1);
    }

    /// End-of-directory entry. The SOI marker that must follow it is
    /// written as part of the entry.
    pub(crate) fn write_spiff_end_of_directory_entry(&mut self) {
        self.write_segment_header(APPLICATION_DATA8, 6);
        self.write_u32(SPIFF_END_OF_DIRECTORY);
        self.write_marker(START_OF_IMAGE);
    }

    pub(crate) fn write_start_of_frame(
        &mut self,
        width: u16,
        height: u16,
        bits_per_sample: u8,
        component_count: u8,
    ) {
        self.write_segment_header(START_OF_FRAME_JPEGLS, 6 + usize::from(component_count) * 3);
        self.out.push(bits_per_sample);
        self.write_u16(height);
        self.write_u16(width);
        self.out.push(component_count);
        for component_id in 1..=component_count {
            self.out.push(component_id);
            // 1x1 sampling, no quantization table
            self.out.push(0x11);
            self.out.push(0);
        }
    }

    pub(crate) fn write_start_of_scan(
        &mut self,
        component_count: u8,
        near_lossless: u8,
        interleave_mode: InterleaveMode,
    ) {
        self.write_segment_header(START_OF_SCAN, 1 + usize::from(component_count) * 2 + 3);
        self.out.push(component_count);
        for component_id in 1..=component_count {
            self.out.push(component_id);
            // No mapping table
            self.out.push(0);
        }
        self.out.push(near_lossless);
        self.out.push(interleave_mode as u8);
        // No point transform
        self.out.push(0);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.out
    }

    fn write_marker(&mut self, marker: u8) {
        self.out.push(0xFF);
        self.out.push(marker);
    }

    /// The length field counts itself, so it is `data_size + 2`.
    fn write_segment_header(&mut self, marker: u8, data_size: usize) {
        self.write_marker(marker);
        self.write_u16((data_size + 2) as u16);
    }

    fn write_u16(&mut self, value: u16) {
        self.out.extend_from_slice(&value.to_be_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.out.extend_from_slice(&value.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiff_header_layout() {
        let mut writer = JpegStreamWriter::new(64);
        writer.write_standard_spiff_header(SpiffColorSpace::Rgb, 3, 2, 5, 8);
        let bytes = writer.into_inner();

        assert_eq!(
            bytes,
            vec![
                0xFF, 0xE8, 0x00, 0x20, b'S', b'P', b'I', b'F', b'F', 0, 2, 0, 0, 3, 0, 0, 0, 2,
                0, 0, 0, 5, 10, 8, 6, 0, 0, 0, 0, 1, 0, 0, 0, 1,
            ]
        );
    }

    #[test]
    fn test_end_of_directory_entry() {
        let mut writer = JpegStreamWriter::new(16);
        writer.write_spiff_end_of_directory_entry();
        assert_eq!(
            writer.into_inner(),
            vec![0xFF, 0xE8, 0x00, 0x08, 0, 0, 0, 1, 0xFF, 0xD8]
        );
    }

    #[test]
    fn test_frame_and_scan_headers() {
        let mut writer = JpegStreamWriter::new(64);
        writer.write_start_of_frame(640, 480, 8, 3);
        writer.write_start_of_scan(3, 0, InterleaveMode::Sample);

        assert_eq!(
            writer.into_inner(),
            vec![
                0xFF, 0xF7, 0x00, 0x11, 8, 0x01, 0xE0, 0x02, 0x80, 3, 1, 0x11, 0, 2, 0x11, 0, 3,
                0x11, 0, 0xFF, 0xDA, 0x00, 0x0C, 3, 1, 0, 2, 0, 3, 0, 0, 2, 0,
            ]
        );
    }
}
