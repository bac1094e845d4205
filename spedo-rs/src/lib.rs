//! Bicycle speedometer core: reed switch debouncing, trip statistics and
//! display rendering.
//!
//! # Architecture
//!
//! ```text
//! reed switch ──► WheelEventDetector ──► SpeedEngine ──► TripStats
//!                      │                                   │
//!                      ▼                                   ▼
//!               render_readout ──► SegmentBus        render_status ──► OLED
//! ```
//!
//! [`Speedometer`] owns all of it and is advanced once per millisecond by
//! the firmware main loop. Every module here is hardware-independent and
//! runs on the host under `cargo test`; pins and flash are reached through
//! `embedded-hal` and `embedded-storage` traits.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. Text is formatted into `heapless` strings. The
//! optional `defmt` feature derives `defmt::Format` on the public types.

#![no_std]

pub mod clock;
pub mod config;
pub mod detector;
pub mod error;
pub mod odometer;
pub mod segments;
pub mod seven_segment;
pub mod speedometer;
pub mod status;
pub mod trip;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use clock::TickClock;
pub use config::SpeedometerConfig;
pub use detector::{FsmState, SensorSample, WheelEvent, WheelEventDetector};
pub use error::OdometerError;
pub use odometer::OdometerStore;
pub use segments::DisplayMask;
pub use seven_segment::{render_readout, Readout, SegmentBus};
pub use speedometer::{Speedometer, TickOutput};
pub use status::{render_status, StatusFrame};
pub use trip::{average_speed_kmh, speed_kmh, SpeedEngine, TripStats};
