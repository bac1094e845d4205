//! Trip status screen for the spedo speedometer on an SSD1306 (128×64).
//!
//! This crate provides [`StatusDisplay`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode, the [`layout`] that places a
//! [`StatusFrame`](spedo::StatusFrame) on the panel, and (with the `task`
//! feature) [`status_display_task`], the redraw loop fed by the firmware
//! main loop.
//!
//! # Quick Start
//!
//! ```ignore
//! use spedo_oled_display_rs::{StatusDisplay, StatusDisplayConfig, StatusSignal};
//!
//! static FRAMES: StatusSignal = StatusSignal::new();
//!
//! let oled = StatusDisplay::new(i2c_oled, 0x3C);
//! spawner.spawn(oled_task(oled, &FRAMES, StatusDisplayConfig::default())).unwrap();
//!
//! // Once per trip-clock second:
//! FRAMES.signal(speedo.status_frame());
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via `defmt`.
//! - **`task`**: the Embassy redraw loop.

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::{status_display_task, StatusSignal};
pub use driver::StatusDisplay;
pub use error::OledError;
pub use layout::{draw_text_at, render_status_frame, StatusDisplayConfig};
