//! 80-bit IEEE 754 extended precision numbers, as used by the AIFF `COMM`
//! chunk to store the sample rate.
//!
//! The value is stored as a 16-bit sign/exponent word followed by a 64-bit
//! mantissa with an explicit integer bit. The mantissa is handled as two
//! 32-bit words.

use crate::prelude::*;

const EXPONENT_BIAS: i32 = 16383;
const EXPONENT_INFINITE: i16 = 0x7FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extended {
    pub exponent: i16,
    pub hi_mant: u32,
    pub lo_mant: u32,
}

impl Extended {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        Ok(Self {
            exponent: reader.read_i16::<BigEndian>()?,
            hi_mant: reader.read_u32::<BigEndian>()?,
            lo_mant: reader.read_u32::<BigEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; 10] {
        let mut buffer = [0u8; 10];
        buffer[0..2].copy_from_slice(&self.exponent.to_be_bytes());
        buffer[2..6].copy_from_slice(&self.hi_mant.to_be_bytes());
        buffer[6..10].copy_from_slice(&self.lo_mant.to_be_bytes());
        buffer
    }

    /// Decodes the value. Infinities and NaNs collapse to `f64::MAX`; the
    /// sign bit is carried in the exponent word and is not interpreted.
    pub fn to_f64(&self) -> f64 {
        match (self.exponent, self.hi_mant, self.lo_mant) {
            (0, 0, 0) => 0.0,
            (EXPONENT_INFINITE, _, _) => f64::MAX,
            _ => {
                let mut exp = self.exponent as i32 - EXPONENT_BIAS - 31;
                let mut value = self.hi_mant as f64 * 2.0_f64.powi(exp);
                exp -= 32;
                value += self.lo_mant as f64 * 2.0_f64.powi(exp);
                value
            }
        }
    }

    /// Encodes a non-negative finite value.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self {
                exponent: EXPONENT_INFINITE,
                hi_mant: 0x8000_0000,
                lo_mant: 0,
            };
        }
        if value <= 0.0 {
            return Self::default();
        }

        // Normalize to [1.0, 2.0)
        let mut exponent = EXPONENT_BIAS;
        let mut fraction = value;
        while fraction >= 2.0 {
            fraction /= 2.0;
            exponent += 1;
        }
        while fraction < 1.0 {
            fraction *= 2.0;
            exponent -= 1;
        }

        if exponent > EXPONENT_INFINITE as i32 - 1 {
            return Self::from_f64(f64::INFINITY);
        }
        if exponent < 0 {
            return Self::default();
        }

        // The integer bit is explicit in the extended format
        let mantissa = (fraction * (1u64 << 63) as f64) as u64;
        Self {
            exponent: exponent as i16,
            hi_mant: (mantissa >> 32) as u32,
            lo_mant: mantissa as u32,
        }
    }
}
