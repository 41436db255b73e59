//! Conversion of raw channel counts into lux and proximity

use core::fmt;

use crate::config::{Config, CYCLE_MS};
use crate::ll::{Register, DATA_BLOCK_LEN};

/// Glass attenuation and device factor folded into a single divisor
pub const GAIN_DIVISOR: f64 = 20.0;

/// Channel weights of one candidate lux formula: `(c0 * ch0 - c1 * ch1) / CPL`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuxWeights {
    /// Channel 0 weight
    pub ch0: f64,
    /// Channel 1 weight
    pub ch1: f64,
}

impl LuxWeights {
    fn apply(&self, sample: &RawSample, cpl: f64) -> f64 {
        (self.ch0 * sample.c0 as f64 - self.ch1 * sample.c1 as f64) / cpl
    }
}

/// First candidate formula
pub const FORMULA_A: LuxWeights = LuxWeights { ch0: 1.00, ch1: 1.75 };

/// Second candidate formula
pub const FORMULA_B: LuxWeights = LuxWeights { ch0: 0.63, ch1: 1.00 };

const C1_OFFSET: usize = (Register::C1DATA - Register::C0DATA) as usize;
const PDATA_OFFSET: usize = (Register::PDATA - Register::C0DATA) as usize;

/// Raw contents of the 6-byte data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RawSample {
    /// ALS channel 0 count
    pub c0: u16,
    /// ALS channel 1 count
    pub c1: u16,
    /// Proximity count
    pub proximity: u16,
}

impl RawSample {
    /// Decode the little-endian C0DATA, C1DATA and PDATA fields
    pub const fn from_bytes(data: &[u8; DATA_BLOCK_LEN]) -> Self {
        Self {
            c0: u16::from_le_bytes([data[0], data[1]]),
            c1: u16::from_le_bytes([data[C1_OFFSET], data[C1_OFFSET + 1]]),
            proximity: u16::from_le_bytes([data[PDATA_OFFSET], data[PDATA_OFFSET + 1]]),
        }
    }
}

/// Counts-per-lux parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Calibration {
    /// ALS integration time in milliseconds
    pub integration_time_ms: f64,
    /// ALS analog gain factor
    pub als_gain: f64,
    /// Fixed divisor for the device and cover glass
    pub gain_divisor: f64,
}

impl Calibration {
    /// Calibration matching [`Config::DEFAULT`]: 2.73 ms, 1x gain.
    pub const DEFAULT: Self = Self {
        integration_time_ms: CYCLE_MS,
        als_gain: 1.0,
        gain_divisor: GAIN_DIVISOR,
    };

    /// Calibration for the timing and gain a configuration applies.
    ///
    /// Must be recomputed whenever ATIME or the ALS gain changes.
    pub fn for_config(config: &Config) -> Self {
        Self {
            integration_time_ms: config.als_integration_time_ms(),
            als_gain: config.control.als_gain.multiplier(),
            gain_divisor: GAIN_DIVISOR,
        }
    }

    /// Counts per lux
    pub fn cpl(&self) -> f64 {
        (self.integration_time_ms * self.als_gain) / self.gain_divisor
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Pick the luminance from the two candidate formulas.
///
/// A candidate wins only if it is positive and strictly greater than the other.
/// Ties and non-positive results give 0.0.
pub fn select_luminance(a: f64, b: f64) -> f64 {
    if a > 0.0 && a > b {
        a
    } else if b > 0.0 && b > a {
        b
    } else {
        0.0
    }
}

/// Illuminance and proximity derived from one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Measurement {
    /// Illuminance in lux
    pub luminance: f64,
    /// Raw proximity count, unscaled
    pub proximity: f64,
}

impl Measurement {
    /// Convert a raw sample
    pub fn from_raw(sample: &RawSample, calibration: &Calibration) -> Self {
        let cpl = calibration.cpl();
        let a = FORMULA_A.apply(sample, cpl);
        let b = FORMULA_B.apply(sample, cpl);
        Self {
            luminance: select_luminance(a, b),
            proximity: sample.proximity as f64,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ambient Light Luminance : {:.2} lux", self.luminance)?;
        write!(f, "Proximity of the Device : {:.2}", self.proximity)
    }
}
