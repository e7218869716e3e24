//! Lossless JPEG-LS scan decoding for the 8-bit, 3-component,
//! sample-interleaved scans produced by `ScanEncoder`.
//!
//! Only built for tests: it mirrors the encoder's context modelling so an
//! encoded image can be checked sample for sample.

use crate::image_pipeline::jpegls::context::{
    CONTEXT_COUNT, J, LIMIT, QUANTIZED_BITS_PER_PIXEL, RANGE, RegularContext, RunModeContext,
    context_id, correct_prediction, predict, quantize_gradient, sign,
};

const COMPONENTS: usize = 3;

type Pixel = [i32; COMPONENTS];

/// MSB-first bit reader that drops the stuffed zero bit following 0xFF.
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    current: u8,
    bits_left: u32,
    ff_read: bool,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            current: 0,
            bits_left: 0,
            ff_read: false,
        }
    }

    fn read_bit(&mut self) -> u32 {
        if self.bits_left == 0 {
            assert!(
                self.position < self.data.len(),
                "scan ended after {} bytes",
                self.data.len()
            );
            let byte = self.data[self.position];
            self.position += 1;

            if self.ff_read {
                assert!(byte < 0x80, "byte {byte:#04X} after 0xFF forms a marker");
                self.bits_left = 7;
            } else {
                self.bits_left = 8;
            }
            self.current = byte;
            self.ff_read = byte == 0xFF;
        }
        self.bits_left -= 1;
        u32::from((self.current >> self.bits_left) & 1)
    }

    fn read_bits(&mut self, count: u32) -> u32 {
        (0..count).fold(0, |value, _| (value << 1) | self.read_bit())
    }
}

pub(crate) struct ScanDecoder<'a> {
    width: usize,
    reader: BitReader<'a>,
    contexts: [RegularContext; CONTEXT_COUNT],
    run_contexts: [RunModeContext; 2],
    run_index: usize,
}

impl<'a> ScanDecoder<'a> {
    pub(crate) fn new(scan: &'a [u8], width: usize) -> Self {
        Self {
            width,
            reader: BitReader::new(scan),
            contexts: [RegularContext::new(); CONTEXT_COUNT],
            run_contexts: [RunModeContext::new(0), RunModeContext::new(1)],
            run_index: 0,
        }
    }

    /// Decodes `height` lines into tightly packed 3-byte pixels.
    pub(crate) fn decode(mut self, height: usize) -> Vec<u8> {
        let width = self.width;
        let mut previous: Vec<Pixel> = vec![[0; COMPONENTS]; width + 2];
        let mut current: Vec<Pixel> = vec![[0; COMPONENTS]; width + 2];
        let mut pixels = Vec::with_capacity(width * height * COMPONENTS);

        for _ in 0..height {
            previous[width + 1] = previous[width];
            current[0] = previous[1];

            self.decode_line(&previous, &mut current);
            for pixel in &current[1..=width] {
                pixels.extend(pixel.iter().map(|&sample| sample as u8));
            }
            std::mem::swap(&mut previous, &mut current);
        }

        pixels
    }

    fn decode_line(&mut self, previous: &[Pixel], current: &mut [Pixel]) {
        let mut index = 1;
        while index <= self.width {
            let ra = current[index - 1];
            let rc = previous[index - 1];
            let rb = previous[index];
            let rd = previous[index + 1];

            let qs: [i32; COMPONENTS] = std::array::from_fn(|c| {
                context_id(
                    quantize_gradient(rd[c] - rb[c]),
                    quantize_gradient(rb[c] - rc[c]),
                    quantize_gradient(rc[c] - ra[c]),
                )
            });

            if qs.iter().all(|&q| q == 0) {
                index += self.decode_run_mode(index, previous, current);
            } else {
                for c in 0..COMPONENTS {
                    current[index][c] = self.decode_regular(qs[c], predict(ra[c], rb[c], rc[c]));
                }
                index += 1;
            }
        }
    }

    fn decode_regular(&mut self, qs: i32, predicted: i32) -> i32 {
        let sign = sign(qs);
        let context_index = qs.unsigned_abs() as usize;
        let context = self.contexts[context_index];

        let k = context.golomb_parameter();
        let correction = context.error_correction(k);
        let predicted = correct_prediction(predicted + sign * context.bias());

        let mapped_error = self.decode_mapped_value(k, LIMIT);
        let error = unmap_error_value(mapped_error) ^ correction;
        self.contexts[context_index].update(error);

        (predicted + sign * error).rem_euclid(RANGE)
    }

    fn decode_run_mode(&mut self, start: usize, previous: &[Pixel], current: &mut [Pixel]) -> usize {
        let remaining = self.width + 1 - start;
        let ra = current[start - 1];

        let run_length = self.decode_run_pixels(remaining);
        current[start..start + run_length].fill(ra);
        if run_length == remaining {
            return run_length;
        }

        let position = start + run_length;
        current[position] = self.decode_run_interruption_pixel(ra, previous[position]);
        self.decrement_run_index();
        run_length + 1
    }

    fn decode_run_pixels(&mut self, remaining: usize) -> usize {
        let mut run_length = 0;
        while self.reader.read_bit() == 1 {
            let segment = 1usize << J[self.run_index];
            let count = segment.min(remaining - run_length);
            run_length += count;
            if count == segment {
                self.increment_run_index();
            }
            if run_length == remaining {
                return run_length;
            }
        }
        run_length + self.reader.read_bits(J[self.run_index]) as usize
    }

    fn decode_run_interruption_pixel(&mut self, ra: Pixel, rb: Pixel) -> Pixel {
        std::array::from_fn(|c| {
            let error = self.decode_run_interruption_error(0);
            (rb[c] + sign(rb[c] - ra[c]) * error).rem_euclid(RANGE)
        })
    }

    fn decode_run_interruption_error(&mut self, context_index: usize) -> i32 {
        let context = self.run_contexts[context_index];
        let k = context.golomb_parameter();
        let limit = LIMIT - J[self.run_index] as i32 - 1;
        let mapped_error = self.decode_mapped_value(k, limit);

        let magnitude = (mapped_error + context.run_interruption_type() + 1) / 2;
        let error = [magnitude, -magnitude]
            .into_iter()
            .find(|&candidate| {
                2 * candidate.abs()
                    - context.run_interruption_type()
                    - i32::from(context.compute_map(candidate, k))
                    == mapped_error
            })
            .unwrap_or_else(|| panic!("mapped error {mapped_error} has no preimage"));

        self.run_contexts[context_index].update(error, mapped_error);
        error
    }

    fn decode_mapped_value(&mut self, k: i32, limit: i32) -> i32 {
        let mut high_bits = 0;
        while self.reader.read_bit() == 0 {
            high_bits += 1;
            assert!(high_bits < limit, "unary prefix exceeds LIMIT");
        }

        if high_bits < limit - QUANTIZED_BITS_PER_PIXEL - 1 {
            (high_bits << k) | self.reader.read_bits(k as u32) as i32
        } else {
            self.reader.read_bits(QUANTIZED_BITS_PER_PIXEL as u32) as i32 + 1
        }
    }

    fn increment_run_index(&mut self) {
        if self.run_index < J.len() - 1 {
            self.run_index += 1;
        }
    }

    fn decrement_run_index(&mut self) {
        self.run_index = self.run_index.saturating_sub(1);
    }
}

fn unmap_error_value(mapped_error: i32) -> i32 {
    if mapped_error & 1 == 0 {
        mapped_error / 2
    } else {
        -(mapped_error + 1) / 2
    }
}
