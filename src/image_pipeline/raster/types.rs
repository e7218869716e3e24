//! Decoded raster image types

/// Bytes per pixel of every buffer the pipeline handles (8-bit, 3 channels, no alpha).
pub const BYTES_PER_PIXEL: usize = 3;

/// Byte order of the three channels inside one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// The order obtained by swapping the first and third channel.
    pub fn swapped(self) -> Self {
        match self {
            ChannelOrder::Rgb => ChannelOrder::Bgr,
            ChannelOrder::Bgr => ChannelOrder::Rgb,
        }
    }
}

/// One decoded image and the layout of its memory.
///
/// Byte `channel` of pixel `column` on scanline `line` lives at
/// `line * stride + column * BYTES_PER_PIXEL + channel`. Bytes between
/// `width * BYTES_PER_PIXEL` and `stride` on each line are padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Byte distance between the starts of consecutive scanlines.
    /// Negative values describe a bottom-up layout.
    pub stride: isize,
    /// Channel order the decoder wrote the pixels in
    pub channel_order: ChannelOrder,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn row_bytes(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    pub fn is_top_down(&self) -> bool {
        self.stride >= 0
    }

    /// Smallest `data` length that holds every pixel of a top-down layout.
    ///
    /// The last row needs no padding, so an exact-fit buffer is
    /// `(height - 1) * stride + row_bytes` long.
    pub fn required_len(&self) -> Option<usize> {
        if self.height == 0 || self.width == 0 {
            return Some(0);
        }
        let stride = usize::try_from(self.stride).ok()?;
        (self.height - 1)
            .checked_mul(stride)?
            .checked_add(self.row_bytes())
    }

    /// Mutable views of the pixel bytes of each scanline, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics on a bottom-up buffer, or when `data` is shorter than the
    /// layout claims. Both are rejected by `LayoutValidator` first.
    pub fn pixel_rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        assert!(
            self.is_top_down(),
            "bottom-up pixel buffers have no top-down rows"
        );
        let stride = self.stride.unsigned_abs();
        let row_bytes = self.row_bytes();
        let rows = if row_bytes == 0 { 0 } else { self.height };

        self.data
            .chunks_mut(stride.max(1))
            .take(rows)
            .map(move |row| &mut row[..row_bytes])
    }
}
