//! Context modelling for 8-bit lossless JPEG-LS (ITU-T T.87).

/// Number of distinct sample values.
pub(crate) const RANGE: i32 = 256;
pub(crate) const MAX_SAMPLE_VALUE: i32 = RANGE - 1;
/// Bits needed for one mapped error value.
pub(crate) const QUANTIZED_BITS_PER_PIXEL: i32 = 8;
/// Maximum code length of one mapped error value.
pub(crate) const LIMIT: i32 = 2 * (8 + 8);
pub(crate) const RESET_THRESHOLD: i32 = 64;

/// Default gradient thresholds for MAXVAL = 255, NEAR = 0.
pub(crate) const T1: i32 = 3;
pub(crate) const T2: i32 = 7;
pub(crate) const T3: i32 = 21;

/// Number of regular-mode contexts after sign folding.
pub(crate) const CONTEXT_COUNT: usize = 365;

const MAX_K: i32 = 16;
const MIN_C: i32 = -128;
const MAX_C: i32 = 127;

/// Run length order table.
pub(crate) const J: [u32; 32] = [
    0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 9, 10, 11, 12, 13,
    14, 15,
];

fn initial_a() -> i32 {
    ((RANGE + 32) / 64).max(2)
}

pub(crate) fn quantize_gradient(d: i32) -> i32 {
    if d <= -T3 {
        -4
    } else if d <= -T2 {
        -3
    } else if d <= -T1 {
        -2
    } else if d < 0 {
        -1
    } else if d == 0 {
        0
    } else if d < T1 {
        1
    } else if d < T2 {
        2
    } else if d < T3 {
        3
    } else {
        4
    }
}

pub(crate) fn context_id(q1: i32, q2: i32, q3: i32) -> i32 {
    (q1 * 9 + q2) * 9 + q3
}

/// Median edge detector.
pub(crate) fn predict(ra: i32, rb: i32, rc: i32) -> i32 {
    if rc >= ra.max(rb) {
        ra.min(rb)
    } else if rc <= ra.min(rb) {
        ra.max(rb)
    } else {
        ra + rb - rc
    }
}

pub(crate) fn correct_prediction(predicted: i32) -> i32 {
    predicted.clamp(0, MAX_SAMPLE_VALUE)
}

/// Reduces a prediction error modulo RANGE into `[-128, 127]`.
pub(crate) fn modulo_range(error: i32) -> i32 {
    let mut error = error;
    if error < 0 {
        error += RANGE;
    }
    if error >= (RANGE + 1) / 2 {
        error -= RANGE;
    }
    error
}

/// Folds signed errors onto non-negative integers: 0, -1, 1, -2, 2, ...
pub(crate) fn map_error_value(error: i32) -> i32 {
    if error >= 0 { 2 * error } else { -2 * error - 1 }
}

pub(crate) fn sign(n: i32) -> i32 {
    if n < 0 { -1 } else { 1 }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RegularContext {
    a: i32,
    b: i32,
    c: i32,
    n: i32,
}

impl RegularContext {
    pub(crate) fn new() -> Self {
        Self {
            a: initial_a(),
            b: 0,
            c: 0,
            n: 1,
        }
    }

    pub(crate) fn bias(&self) -> i32 {
        self.c
    }

    pub(crate) fn golomb_parameter(&self) -> i32 {
        let mut k = 0;
        while (self.n << k) < self.a && k < MAX_K {
            k += 1;
        }
        k
    }

    pub(crate) fn error_correction(&self, k: i32) -> i32 {
        if k != 0 {
            return 0;
        }
        if 2 * self.b + self.n - 1 < 0 { -1 } else { 0 }
    }

    pub(crate) fn update(&mut self, error: i32) {
        self.a += error.abs();
        self.b += error;

        if self.n == RESET_THRESHOLD {
            self.a >>= 1;
            self.b >>= 1;
            self.n >>= 1;
        }
        self.n += 1;

        if self.b + self.n <= 0 {
            self.b += self.n;
            if self.b <= -self.n {
                self.b = -self.n + 1;
            }
            if self.c > MIN_C {
                self.c -= 1;
            }
        } else if self.b > 0 {
            self.b -= self.n;
            if self.b > 0 {
                self.b = 0;
            }
            if self.c < MAX_C {
                self.c += 1;
            }
        }
    }
}

/// Statistics for run interruption samples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunModeContext {
    a: i32,
    n: i32,
    nn: i32,
    run_interruption_type: i32,
}

impl RunModeContext {
    pub(crate) fn new(run_interruption_type: i32) -> Self {
        Self {
            a: initial_a(),
            n: 1,
            nn: 0,
            run_interruption_type,
        }
    }

    pub(crate) fn run_interruption_type(&self) -> i32 {
        self.run_interruption_type
    }

    pub(crate) fn golomb_parameter(&self) -> i32 {
        let temp = self.a + (self.n >> 1) * self.run_interruption_type;
        let mut n_test = self.n;
        let mut k = 0;
        while n_test < temp {
            n_test <<= 1;
            k += 1;
        }
        k
    }

    pub(crate) fn compute_map(&self, error: i32, k: i32) -> bool {
        (k == 0 && error > 0 && 2 * self.nn < self.n)
            || (error < 0 && 2 * self.nn >= self.n)
            || (error < 0 && k != 0)
    }

    pub(crate) fn update(&mut self, error: i32, mapped_error: i32) {
        if error < 0 {
            self.nn += 1;
        }
        self.a += (mapped_error + 1 - self.run_interruption_type) >> 1;
        if self.n == RESET_THRESHOLD {
            self.a >>= 1;
            self.n >>= 1;
            self.nn >>= 1;
        }
        self.n += 1;
    }
}
