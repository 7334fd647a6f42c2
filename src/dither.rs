//! Bit depth reduction from 16-bit signed to 8-bit unsigned samples, with
//! optional noise-shaped dithering.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::prelude::*;

// For shaped dithering
const DITHER_BUF_SIZE: usize = 8;
const DITHER_BUF_MASK: usize = DITHER_BUF_SIZE - 1;

/// Lipshitz's minimally audible FIR
pub const SHAPED_BS: [f64; 5] = [2.033, -2.165, 1.959, -1.590, 0.6149];

const I16_TO_U8_DIVISOR: f64 = 256.0;
const U8_MIN_F: f64 = 0.0;
const U8_MAX_F: f64 = 255.0;

/// How 16-bit samples are quantized to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Plain rounding.
    #[default]
    Off,
    /// Error feedback through the shaping filter, no added noise.
    Shaped,
    /// Error feedback plus triangular (TPDF) noise before rounding.
    Triangular,
}

/// `floor(v + 0.5)`, so halves always round up.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Saturates to the unsigned 8-bit range.
pub fn clamp_u8(v: f64) -> u8 {
    v.clamp(U8_MIN_F, U8_MAX_F) as u8
}

/// Maps a signed 16-bit sample onto the unsigned 8-bit scale, unrounded.
pub fn to_u8_scale(sample: i16) -> f64 {
    sample as f64 / I16_TO_U8_DIVISOR + U8_OFFSET
}

/// Reduction without dither.
pub fn reduce_nominal(sample: i16) -> u8 {
    clamp_u8(round_half_up(to_u8_scale(sample)))
}

/// Quantization error history for the noise shaping filter.
///
/// Holds the last 8 errors in a ring; the 5 most recent are weighted by
/// [`SHAPED_BS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DitherState {
    buffer: [f64; DITHER_BUF_SIZE],
    idx: usize,
}

impl DitherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantizes `v` (already on the 8-bit scale) and feeds the error back.
    /// Returns the rounded value, unclamped.
    pub fn process(&mut self, v: f64, noise: f64) -> f64 {
        let xe = v + SHAPED_BS
            .iter()
            .enumerate()
            .map(|(k, b)| self.buffer[self.idx.wrapping_sub(k) & DITHER_BUF_MASK] * b)
            .sum::<f64>();

        let result = round_half_up(xe + noise);
        self.idx = (self.idx + 1) & DITHER_BUF_MASK;
        self.buffer[self.idx] = xe - result;
        result
    }

    pub fn history(&self) -> &[f64; DITHER_BUF_SIZE] {
        &self.buffer
    }

    pub fn index(&self) -> usize {
        self.idx
    }
}

/// Converts retained samples to output bytes. 8-bit samples are copied,
/// 16-bit samples are reduced according to the [`DitherMode`].
pub struct Reducer {
    mode: DitherMode,
    state: DitherState,
    rng: StdRng,
}

impl Reducer {
    /// A fixed `seed` makes the dither noise reproducible.
    pub fn new(mode: DitherMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            mode,
            state: DitherState::new(),
            rng,
        }
    }

    pub fn mode(&self) -> DitherMode {
        self.mode
    }

    pub fn state(&self) -> &DitherState {
        &self.state
    }

    /// Triangular noise: sum of two uniform draws in [-0.5, 0.5].
    fn noise(&mut self) -> f64 {
        match self.mode {
            DitherMode::Triangular => {
                self.rng.random_range(-0.5..=0.5) + self.rng.random_range(-0.5..=0.5)
            }
            DitherMode::Off | DitherMode::Shaped => 0.0,
        }
    }

    pub fn reduce_i16(&mut self, sample: i16) -> u8 {
        match self.mode {
            DitherMode::Off => reduce_nominal(sample),
            DitherMode::Shaped | DitherMode::Triangular => {
                let noise = self.noise();
                clamp_u8(self.state.process(to_u8_scale(sample), noise))
            }
        }
    }

    pub fn reduce(&mut self, sample: Sample) -> u8 {
        match sample {
            Sample::U8(value) => value,
            Sample::I16(value) => self.reduce_i16(value),
        }
    }
}
