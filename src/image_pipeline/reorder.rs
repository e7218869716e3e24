//! In-place channel reordering.
//!
//! Swaps the first and third byte of every pixel, turning BGR into RGB and
//! back. Stride padding is never read or written. Applying the swap twice
//! restores the original bytes.

use tracing::debug;

use crate::image_pipeline::raster::{BYTES_PER_PIXEL, PixelBuffer};

pub struct ChannelReorderer;

impl ChannelReorderer {
    /// Swaps channel 0 and channel 2 of every pixel and flips the buffer's
    /// declared channel order.
    ///
    /// Single pass, no allocation. The buffer must have passed
    /// `LayoutValidator`; a bottom-up or undersized buffer panics.
    pub fn reorder_to_target_color_order(buffer: &mut PixelBuffer) {
        debug!(
            "Swapping first and third channel of {}x{} pixels",
            buffer.width, buffer.height
        );

        for row in buffer.pixel_rows_mut() {
            for pixel in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.swap(0, 2);
            }
        }
        buffer.channel_order = buffer.channel_order.swapped();
    }
}
