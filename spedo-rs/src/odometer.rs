//! Best-effort lifetime distance stored in one flash erase sector.
//!
//! The sector holds a single 16-byte record:
//!
//! ```text
//! 0..4    magic "SPDO" (LE u32)
//! 4       record version
//! 5..8    reserved (0)
//! 8..12   lifetime distance in metres (LE u32)
//! 12..15  reserved (0)
//! 15      checksum over bytes 0..15
//! ```
//!
//! An erased, foreign or corrupt sector reads as "no record"; the bike
//! still works, it just starts counting from zero.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::error::OdometerError;

const RECORD_MAGIC: u32 = 0x4F44_5053;
const RECORD_VERSION: u8 = 1;
const RECORD_LEN: usize = 16;

/// Persists the lifetime distance in a reserved flash sector.
pub struct OdometerStore<F> {
    flash: F,
    offset: u32,
    saved_m: Option<u32>,
}

impl<F> OdometerStore<F>
where
    F: NorFlash,
{
    /// Use the erase sector starting at `offset`.
    ///
    /// # Errors
    ///
    /// * [`OdometerError::BadRegion`] if `offset` is not sector aligned or
    ///   the sector runs past the end of the flash.
    /// * [`OdometerError::UnsupportedWriteSize`] if the flash cannot write a
    ///   16-byte record in whole write units.
    pub fn new(flash: F, offset: u32) -> Result<Self, OdometerError<F::Error>> {
        if RECORD_LEN % F::WRITE_SIZE != 0 || RECORD_LEN % F::READ_SIZE != 0 {
            return Err(OdometerError::UnsupportedWriteSize);
        }
        let end = offset as usize + F::ERASE_SIZE;
        if offset as usize % F::ERASE_SIZE != 0 || end > flash.capacity() {
            return Err(OdometerError::BadRegion);
        }
        Ok(Self {
            flash,
            offset,
            saved_m: None,
        })
    }

    /// Use the last erase sector of the flash.
    pub fn last_sector(flash: F) -> Result<Self, OdometerError<F::Error>> {
        let offset = flash
            .capacity()
            .checked_sub(F::ERASE_SIZE)
            .ok_or(OdometerError::BadRegion)?;
        Self::new(flash, offset as u32)
    }

    /// Read the stored lifetime distance in metres.
    ///
    /// Returns `None` when the sector is erased, holds another record type,
    /// fails its checksum, or cannot be read.
    pub fn load(&mut self) -> Option<u32> {
        let mut record = [0u8; RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        let distance_m = decode(&record)?;
        self.saved_m = Some(distance_m);
        Some(distance_m)
    }

    /// Store `distance_m`, erasing the sector first.
    ///
    /// Skips the flash entirely when the value equals the last one loaded
    /// or saved.
    pub fn save(&mut self, distance_m: u32) -> Result<(), OdometerError<F::Error>> {
        if self.saved_m == Some(distance_m) {
            return Ok(());
        }
        let record = encode(distance_m);
        self.flash
            .erase(self.offset, self.offset + F::ERASE_SIZE as u32)?;
        self.flash.write(self.offset, &record)?;
        self.saved_m = Some(distance_m);

        #[cfg(feature = "defmt")]
        defmt::debug!("odometer saved: {} m", distance_m);

        Ok(())
    }

    /// Give the flash back.
    pub fn release(self) -> F {
        self.flash
    }
}

fn encode(distance_m: u32) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];
    record[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    record[4] = RECORD_VERSION;
    record[8..12].copy_from_slice(&distance_m.to_le_bytes());
    record[RECORD_LEN - 1] = checksum8(&record[..RECORD_LEN - 1]);
    record
}

fn decode(record: &[u8; RECORD_LEN]) -> Option<u32> {
    if record.iter().all(|&b| b == 0xFF) {
        return None;
    }
    if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != RECORD_MAGIC {
        return None;
    }
    if record[4] != RECORD_VERSION {
        return None;
    }
    if record[RECORD_LEN - 1] != checksum8(&record[..RECORD_LEN - 1]) {
        return None;
    }
    Some(u32::from_le_bytes([record[8], record[9], record[10], record[11]]))
}

fn checksum8(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0x5Au8, |acc, &b| acc ^ b.rotate_left(1))
}
