//! Byte-addressed EEPROM drivers implementing [`EepromPort`].
//!
//! - [`I2cEeprom`]: 24C16-class part on any `embedded-hal` 1.0 I2C bus.
//!   The 2 KiB array is split into eight 256-byte blocks; the block number
//!   rides in the low three bits of the device address.
//! - [`MemoryEeprom`]: RAM-backed image with the same geometry and erase
//!   value, for the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::{EepromPort, StorageError};

/// Bytes in a 24C16.
pub const EEPROM_SIZE: usize = 2048;
/// Value of an erased cell.
pub const ERASED: u8 = 0xFF;
/// Base 7-bit bus address of the 24Cxx family.
pub const BASE_ADDRESS: u8 = 0x50;
/// Worst-case internal write cycle (t_WR).
const WRITE_CYCLE_MS: u32 = 10;

fn check(address: u16) -> Result<(), StorageError> {
    if usize::from(address) < EEPROM_SIZE {
        Ok(())
    } else {
        Err(StorageError::OutOfRange)
    }
}

/// Split a 11-bit array address into (device address, word address).
pub fn split_address(address: u16) -> (u8, u8) {
    let block = ((address >> 8) & 0x07) as u8;
    (BASE_ADDRESS | block, (address & 0xFF) as u8)
}

// ── I2C part ──────────────────────────────────────────────────

pub struct I2cEeprom<I, D> {
    bus: I,
    delay: D,
}

impl<I: I2c, D: DelayNs> I2cEeprom<I, D> {
    pub fn new(bus: I, delay: D) -> Self {
        Self { bus, delay }
    }
}

impl<I: I2c, D: DelayNs> EepromPort for I2cEeprom<I, D> {
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        check(address)?;
        let (device, word) = split_address(address);
        self.bus.write(device, &[word, value]).map_err(|e| {
            warn!("EEPROM write 0x{:03x} failed: {:?}", address, e);
            StorageError::IoError
        })?;
        self.delay.delay_ms(WRITE_CYCLE_MS);
        Ok(())
    }

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        check(address)?;
        let (device, word) = split_address(address);
        let mut value = [0u8; 1];
        self.bus
            .write_read(device, &[word], &mut value)
            .map_err(|e| {
                warn!("EEPROM read 0x{:03x} failed: {:?}", address, e);
                StorageError::IoError
            })?;
        Ok(value[0])
    }
}

// ── RAM image ─────────────────────────────────────────────────

pub struct MemoryEeprom {
    cells: Vec<u8>,
}

impl Default for MemoryEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEeprom {
    /// A fully erased part.
    pub fn new() -> Self {
        Self {
            cells: vec![ERASED; EEPROM_SIZE],
        }
    }
}

impl EepromPort for MemoryEeprom {
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        check(address)?;
        self.cells[usize::from(address)] = value;
        Ok(())
    }

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        check(address)?;
        Ok(self.cells[usize::from(address)])
    }
}
