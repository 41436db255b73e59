//! Device configuration applied at start-up

use crate::ll::Register;

/// Time to wait after configuration before the first sample is valid.
///
/// Covers power-up plus at least one full integration cycle with a wide margin.
pub const SETTLE_TIME_MS: u32 = 1000;

/// Duration of one ADC integration cycle in milliseconds
pub const CYCLE_MS: f64 = 2.73;

/// Integration time byte for a single 2.73 ms cycle
pub const TIME_2_73MS: u8 = 0xFF;

/// Integration time in milliseconds for an ATIME/PTIME/WTIME register value.
///
/// The sensor counts `256 - value` cycles, so lower bytes mean longer times.
pub fn integration_time_ms(value: u8) -> f64 {
    CYCLE_MS * (256 - value as u16) as f64
}

/// LED drive strength (control register bits 7:6)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LedDrive {
    /// 120 mA
    Ma120 = 0b00,
    /// 60 mA
    Ma60 = 0b01,
    /// 30 mA
    Ma30 = 0b10,
    /// 15 mA
    Ma15 = 0b11,
}

/// Photodiode used for proximity sensing (control register bits 5:4)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ProximityDiode {
    /// Channel 0 diode
    Ch0 = 0b01,
    /// Channel 1 diode
    Ch1 = 0b10,
    /// Both diodes
    Both = 0b11,
}

/// Proximity gain (control register bits 3:2)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ProximityGain {
    /// 1x gain
    Gain1x = 0b00,
    /// 2x gain
    Gain2x = 0b01,
    /// 4x gain
    Gain4x = 0b10,
    /// 8x gain
    Gain8x = 0b11,
}

/// ALS gain (control register bits 1:0)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AlsGain {
    /// 1x gain
    Gain1x = 0b00,
    /// 8x gain
    Gain8x = 0b01,
    /// 16x gain
    Gain16x = 0b10,
    /// 120x gain
    Gain120x = 0b11,
}

impl AlsGain {
    /// Analog gain factor
    pub const fn multiplier(self) -> f64 {
        match self {
            AlsGain::Gain1x => 1.0,
            AlsGain::Gain8x => 8.0,
            AlsGain::Gain16x => 16.0,
            AlsGain::Gain120x => 120.0,
        }
    }
}

/// Enable register contents
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Enable {
    /// PON: internal oscillator on
    pub power: bool,
    /// AEN: ALS enabled
    pub als: bool,
    /// PEN: proximity enabled
    pub proximity: bool,
    /// WEN: wait timer enabled
    pub wait: bool,
}

impl Enable {
    /// Everything on
    pub const ALL: Self = Self {
        power: true,
        als: true,
        proximity: true,
        wait: true,
    };

    /// Register value
    pub const fn bits(self) -> u8 {
        (self.power as u8)
            | ((self.als as u8) << 1)
            | ((self.proximity as u8) << 2)
            | ((self.wait as u8) << 3)
    }
}

/// Control register contents
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Control {
    /// LED drive strength
    pub led_drive: LedDrive,
    /// Proximity diode selection
    pub diode: ProximityDiode,
    /// Proximity gain
    pub proximity_gain: ProximityGain,
    /// ALS gain
    pub als_gain: AlsGain,
}

impl Control {
    /// Register value
    pub const fn bits(self) -> u8 {
        ((self.led_drive as u8) << 6)
            | ((self.diode as u8) << 4)
            | ((self.proximity_gain as u8) << 2)
            | (self.als_gain as u8)
    }
}

/// Register values written by the configurator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    /// Enable register
    pub enable: Enable,
    /// ALS integration time byte
    pub atime: u8,
    /// Proximity integration time byte
    pub ptime: u8,
    /// Wait time byte
    pub wtime: u8,
    /// Control register
    pub control: Control,
}

impl Config {
    /// Power on with proximity, wait and ALS enabled, 2.73 ms timings,
    /// 120 mA LED on the CH1 diode, 1x gains.
    pub const DEFAULT: Self = Self {
        enable: Enable::ALL,
        atime: TIME_2_73MS,
        ptime: TIME_2_73MS,
        wtime: TIME_2_73MS,
        control: Control {
            led_drive: LedDrive::Ma120,
            diode: ProximityDiode::Ch1,
            proximity_gain: ProximityGain::Gain1x,
            als_gain: AlsGain::Gain1x,
        },
    };

    /// Register writes in the order they must be applied
    pub const fn writes(&self) -> [(u8, u8); 5] {
        [
            (Register::ENABLE, self.enable.bits()),
            (Register::ATIME, self.atime),
            (Register::PTIME, self.ptime),
            (Register::WTIME, self.wtime),
            (Register::CONTROL, self.control.bits()),
        ]
    }

    /// ALS integration time in milliseconds
    pub fn als_integration_time_ms(&self) -> f64 {
        integration_time_ms(self.atime)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_register_values() {
        assert_eq!(
            Config::DEFAULT.writes(),
            [(0x00, 0x0F), (0x01, 0xFF), (0x02, 0xFF), (0x03, 0xFF), (0x0F, 0x20)]
        );
    }

    #[test]
    fn control_bit_layout() {
        let control = Control {
            led_drive: LedDrive::Ma15,
            diode: ProximityDiode::Both,
            proximity_gain: ProximityGain::Gain4x,
            als_gain: AlsGain::Gain120x,
        };
        assert_eq!(control.bits(), 0b1111_1011);
    }

    #[test]
    fn enable_bits() {
        let enable = Enable {
            power: true,
            als: true,
            proximity: false,
            wait: false,
        };
        assert_eq!(enable.bits(), 0x03);
        assert_eq!(Enable::ALL.bits(), 0x0F);
    }

    #[test]
    fn integration_time_from_register() {
        assert_eq!(integration_time_ms(0xFF), 2.73);
        assert!((integration_time_ms(0xDC) - 98.28).abs() < 1e-9);
        assert!((integration_time_ms(0x00) - 698.88).abs() < 1e-9);
    }
}
