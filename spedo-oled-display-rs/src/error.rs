//! Error types for the status display.

use display_interface::DisplayError;

/// Errors that can occur while driving the status OLED.
///
/// The `ssd1306` crate folds every I2C bus error into [`DisplayError`], so
/// this enum is not generic over the bus.
#[derive(Debug)]
pub enum OledError {
    /// Display interface error (I2C NACK, arbitration loss, ...).
    Display(DisplayError),
    /// The panel did not accept the initialisation sequence.
    InitializationFailed,
    /// Drawing or flushing was attempted before
    /// [`StatusDisplay::init()`](crate::StatusDisplay::init) succeeded.
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}
