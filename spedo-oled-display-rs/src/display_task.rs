//! Status display refresh loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;
use spedo::StatusFrame;

use crate::driver::StatusDisplay;
use crate::layout::StatusDisplayConfig;

/// Latest status frame published by the main loop.
pub type StatusSignal = Signal<CriticalSectionRawMutex, StatusFrame>;

/// Redraw the status panel whenever the main loop publishes a new frame.
///
/// This is a regular `async fn`, not an Embassy `#[task]`; Embassy tasks
/// cannot be generic, so the firmware wraps it in a concrete task:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: StatusDisplay<I2c<'static, I2C1, Async>>,
///     frames: &'static StatusSignal,
///     config: StatusDisplayConfig,
/// ) {
///     status_display_task(driver, frames, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the panel.
/// 2. Loop:
///    - Wait for the next frame. Only the newest one is kept, so a slow
///      flush never queues stale frames.
///    - Skip it if it matches what is already on the panel.
///    - Clear, render and show (~20 ms of I2C).
///    - Sleep for `config.refresh_period_ms()` to cap the redraw rate.
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns**.
/// * Render / show failure: logs the error and waits for the next frame.
pub async fn status_display_task<I2C>(
    mut driver: StatusDisplay<I2C>,
    frames: &'static StatusSignal,
    config: StatusDisplayConfig,
) where
    I2C: I2c,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = Duration::from_millis(config.refresh_period_ms());
    let mut shown: Option<StatusFrame> = None;

    loop {
        let frame = frames.wait().await;

        if shown.as_ref() == Some(&frame) {
            continue;
        }

        driver.clear();
        if let Err(_e) = driver.render(&frame, &config) {
            #[cfg(feature = "defmt")]
            defmt::error!("Render failed: {}", _e);
            continue;
        }

        if let Err(_e) = driver.show().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
            continue;
        }

        shown = Some(frame);
        Timer::after(period).await;
    }
}
