//! Lossless JPEG-LS scan encoding for 8-bit, 3-component, sample-interleaved
//! pixels.
//!
//! All three components share the regular and run-mode contexts. Run mode
//! is entered only when the local gradients of every component are zero,
//! and a run continues while whole pixels repeat.

use crate::image_pipeline::jpegls::bit_writer::BitWriter;
use crate::image_pipeline::jpegls::context::{
    CONTEXT_COUNT, J, LIMIT, QUANTIZED_BITS_PER_PIXEL, RegularContext, RunModeContext,
    context_id, correct_prediction, map_error_value, modulo_range, predict, quantize_gradient,
    sign,
};

const COMPONENTS: usize = 3;

type Pixel = [i32; COMPONENTS];

pub(crate) struct ScanEncoder {
    width: usize,
    writer: BitWriter,
    contexts: [RegularContext; CONTEXT_COUNT],
    run_contexts: [RunModeContext; 2],
    run_index: usize,
}

impl ScanEncoder {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            writer: BitWriter::new(width * height * COMPONENTS / 2),
            contexts: [RegularContext::new(); CONTEXT_COUNT],
            run_contexts: [RunModeContext::new(0), RunModeContext::new(1)],
            run_index: 0,
        }
    }

    /// Encodes `height` rows of `pixels` whose starts are `stride` bytes apart.
    ///
    /// The caller guarantees `stride >= width * 3` and that the last row
    /// ends inside `pixels`.
    pub(crate) fn encode(mut self, pixels: &[u8], height: usize, stride: usize) -> Vec<u8> {
        let width = self.width;
        let row_bytes = width * COMPONENTS;

        // Index 0 is the sample left of the line, index width + 1 the one
        // right of it. The line above the first one is all zeros.
        let mut previous: Vec<Pixel> = vec![[0; COMPONENTS]; width + 2];
        let mut current: Vec<Pixel> = vec![[0; COMPONENTS]; width + 2];

        for line in 0..height {
            let row = &pixels[line * stride..line * stride + row_bytes];
            for (slot, sample) in current[1..=width]
                .iter_mut()
                .zip(row.chunks_exact(COMPONENTS))
            {
                *slot = [
                    i32::from(sample[0]),
                    i32::from(sample[1]),
                    i32::from(sample[2]),
                ];
            }

            previous[width + 1] = previous[width];
            current[0] = previous[1];

            self.encode_line(&previous, &current);
            std::mem::swap(&mut previous, &mut current);
        }

        self.writer.finish()
    }

    fn encode_line(&mut self, previous: &[Pixel], current: &[Pixel]) {
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
                index += self.encode_run_mode(index, previous, current);
            } else {
                let x = current[index];
                for c in 0..COMPONENTS {
                    self.encode_regular(qs[c], x[c], predict(ra[c], rb[c], rc[c]));
                }
                index += 1;
            }
        }
    }

    fn encode_regular(&mut self, qs: i32, x: i32, predicted: i32) {
        let sign = sign(qs);
        let context_index = qs.unsigned_abs() as usize;
        let context = &self.contexts[context_index];

        let k = context.golomb_parameter();
        let correction = context.error_correction(k);
        let predicted = correct_prediction(predicted + sign * context.bias());
        let error = modulo_range(sign * (x - predicted));

        self.encode_mapped_value(k, map_error_value(correction ^ error), LIMIT);
        self.contexts[context_index].update(error);
    }

    /// Returns the number of pixels consumed, interruption pixel included.
    fn encode_run_mode(&mut self, start: usize, previous: &[Pixel], current: &[Pixel]) -> usize {
        let remaining = self.width + 1 - start;
        let ra = current[start - 1];

        let mut run_length = 0;
        while run_length < remaining && current[start + run_length] == ra {
            run_length += 1;
        }

        let end_of_line = run_length == remaining;
        self.encode_run_pixels(run_length, end_of_line);
        if end_of_line {
            return run_length;
        }

        let position = start + run_length;
        self.encode_run_interruption_pixel(current[position], ra, previous[position]);
        self.decrement_run_index();
        run_length + 1
    }

    fn encode_run_pixels(&mut self, run_length: usize, end_of_line: bool) {
        let mut run_length = run_length;
        while run_length >= 1 << J[self.run_index] {
            self.writer.put_bits(1, 1);
            run_length -= 1 << J[self.run_index];
            self.increment_run_index();
        }

        if end_of_line {
            if run_length != 0 {
                self.writer.put_bits(1, 1);
            }
        } else {
            // Leading zero terminates the run, then the remainder
            self.writer
                .put_bits(run_length as u32, J[self.run_index] + 1);
        }
    }

    fn encode_run_interruption_pixel(&mut self, x: Pixel, ra: Pixel, rb: Pixel) {
        for c in 0..COMPONENTS {
            let error = modulo_range(sign(rb[c] - ra[c]) * (x[c] - rb[c]));
            self.encode_run_interruption_error(0, error);
        }
    }

    fn encode_run_interruption_error(&mut self, context_index: usize, error: i32) {
        let context = &self.run_contexts[context_index];
        let k = context.golomb_parameter();
        let map = context.compute_map(error, k);
        let mapped_error = 2 * error.abs() - context.run_interruption_type() - i32::from(map);

        let limit = LIMIT - J[self.run_index] as i32 - 1;
        self.encode_mapped_value(k, mapped_error, limit);
        self.run_contexts[context_index].update(error, mapped_error);
    }

    /// Limited-length Golomb code (T.87, A.5.3).
    fn encode_mapped_value(&mut self, k: i32, mapped_error: i32, limit: i32) {
        let mut high_bits = mapped_error >> k;

        if high_bits < limit - QUANTIZED_BITS_PER_PIXEL - 1 {
            if high_bits + 1 > 31 {
                self.writer.put_bits(0, (high_bits / 2) as u32);
                high_bits -= high_bits / 2;
            }
            self.writer.put_bits(1, (high_bits + 1) as u32);
            self.writer
                .put_bits((mapped_error & ((1 << k) - 1)) as u32, k as u32);
            return;
        }

        let escape = limit - QUANTIZED_BITS_PER_PIXEL;
        if escape > 31 {
            self.writer.put_bits(0, 31);
            self.writer.put_bits(1, (escape - 31) as u32);
        } else {
            self.writer.put_bits(1, escape as u32);
        }
        self.writer.put_bits(
            ((mapped_error - 1) & ((1 << QUANTIZED_BITS_PER_PIXEL) - 1)) as u32,
            QUANTIZED_BITS_PER_PIXEL as u32,
        );
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
