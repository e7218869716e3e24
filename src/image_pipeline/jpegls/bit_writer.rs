//! MSB-first bit packing with JPEG-LS marker stuffing.
//!
//! After every 0xFF byte the next byte carries only 7 data bits and a
//! leading zero, so no marker code can appear inside the scan (T.87, A.1).

pub(crate) struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    acc_bits: u32,
    ff_written: bool,
}

impl BitWriter {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            acc: 0,
            acc_bits: 0,
            ff_written: false,
        }
    }

    /// Appends the low `count` bits of `value`, most significant first.
    pub(crate) fn put_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        if count == 0 {
            return;
        }
        let mask = (1u64 << count) - 1;
        self.acc = (self.acc << count) | (u64::from(value) & mask);
        self.acc_bits += count;

        loop {
            let width = self.byte_width();
            if self.acc_bits < width {
                break;
            }
            self.acc_bits -= width;
            let byte = ((self.acc >> self.acc_bits) & ((1 << width) - 1)) as u8;
            self.push(byte);
        }
        self.acc &= (1u64 << self.acc_bits) - 1;
    }

    /// Pads the final byte with zeros and returns the scan bytes.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.acc_bits > 0 {
            let width = self.byte_width();
            let byte = (self.acc << (width - self.acc_bits)) as u8;
            self.acc_bits = 0;
            self.push(byte);
        }
        // A scan may not end on 0xFF
        if self.ff_written {
            self.push(0);
        }
        self.out
    }

    fn byte_width(&self) -> u32 {
        if self.ff_written { 7 } else { 8 }
    }

    fn push(&mut self, byte: u8) {
        self.out.push(byte);
        self.ff_written = byte == 0xFF;
    }
}
