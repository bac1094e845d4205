//! Error types for the odometer store.

use core::fmt;

/// Errors that can occur while persisting the lifetime distance.
#[derive(Debug, PartialEq, Eq)]
pub enum OdometerError<E> {
    /// Underlying flash driver error.
    Flash(E),

    /// The reserved region does not start on an erase boundary or does not
    /// fit inside the flash.
    BadRegion,

    /// The flash write granularity does not divide the record size.
    UnsupportedWriteSize,
}

// Allow ergonomic `?` propagation from raw flash errors.
impl<E> From<E> for OdometerError<E> {
    fn from(error: E) -> Self {
        OdometerError::Flash(error)
    }
}

impl<E: fmt::Debug> fmt::Display for OdometerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OdometerError::Flash(e) => write!(f, "Flash error: {:?}", e),
            OdometerError::BadRegion => write!(f, "Odometer region outside flash or misaligned"),
            OdometerError::UnsupportedWriteSize => {
                write!(f, "Flash write size incompatible with odometer record")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for OdometerError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OdometerError::Flash(e) => defmt::write!(f, "Flash error: {}", e),
            OdometerError::BadRegion => defmt::write!(f, "Bad odometer region"),
            OdometerError::UnsupportedWriteSize => defmt::write!(f, "Unsupported write size"),
        }
    }
}
