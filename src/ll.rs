//! Low-level register map and bus framing for the TMD2772

/// I2C address of the TMD2772
pub const I2C_ADDRESS: u8 = 0x39;

/// Command flag that must be set on every register address byte
pub const COMMAND: u8 = 0x80;

/// Register addresses (7-bit offsets, before the command flag is applied)
#[derive(Debug)]
pub struct Register;

impl Register {
    /// Enable register: power, ALS, proximity and wait enables
    pub const ENABLE: u8 = 0x00;
    /// ALS ADC integration time
    pub const ATIME: u8 = 0x01;
    /// Proximity ADC integration time
    pub const PTIME: u8 = 0x02;
    /// Wait time
    pub const WTIME: u8 = 0x03;
    /// Control register: LED drive, proximity diode, proximity and ALS gain
    pub const CONTROL: u8 = 0x0F;
    /// ALS channel 0 data, low byte. Base of the 6-byte data block.
    pub const C0DATA: u8 = 0x14;
    /// ALS channel 1 data, low byte. Read as bytes 2..4 of the block at [`Register::C0DATA`].
    pub const C1DATA: u8 = 0x16;
    /// Proximity data, low byte. Read as bytes 4..6 of the block at [`Register::C0DATA`].
    pub const PDATA: u8 = 0x18;
}

/// Size of the data block starting at [`Register::C0DATA`]
pub const DATA_BLOCK_LEN: usize = 6;

/// Address byte for a register access, with the command flag set.
pub const fn command(register: u8) -> u8 {
    register | COMMAND
}

/// Two-byte frame writing `value` to `register`.
pub const fn write_frame(register: u8, value: u8) -> [u8; 2] {
    [command(register), value]
}

/// One-byte frame selecting `register` for the following read.
pub const fn select_frame(register: u8) -> [u8; 1] {
    [command(register)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_flag_always_set() {
        for register in 0..=u8::MAX {
            assert_eq!(command(register) & COMMAND, COMMAND);
            assert_eq!(command(register) & !COMMAND, register & !COMMAND);
        }
    }

    #[test]
    fn frames_match_register_map() {
        assert_eq!(write_frame(Register::ENABLE, 0x0F), [0x80, 0x0F]);
        assert_eq!(write_frame(Register::CONTROL, 0x20), [0x8F, 0x20]);
        assert_eq!(select_frame(Register::C0DATA), [0x94]);
    }

    #[test]
    fn data_registers_are_contiguous() {
        assert_eq!(Register::C1DATA - Register::C0DATA, 2);
        assert_eq!(Register::PDATA - Register::C0DATA, 4);
        assert_eq!(
            (Register::PDATA + 2 - Register::C0DATA) as usize,
            DATA_BLOCK_LEN
        );
    }
}
