//! spedo-hw-interface
//!
//! Reed-switch bicycle speedometer firmware for the Raspberry Pi Pico 2.
//! Wires the two library crates into a live loop:
//!
//! 1. A magnet on the wheel closes the reed switch once per revolution.
//! 2. The main loop samples the switch once per millisecond and feeds the
//!    sample to the `Speedometer` context, catching up on any overrun.
//! 3. Segment mask changes go straight out on the 14-line segment bus and
//!    the onboard LED mirrors the debounce dwell.
//! 4. Once per trip-clock second a `StatusFrame` snapshot is signalled to
//!    the OLED task, which redraws the trip screen over I2C1.
//! 5. When the bike has been stationary long enough to blank the display,
//!    the lifetime distance is written to the last flash sector.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{FLASH, I2C1};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use spedo::{
    OdometerStore, SegmentBus, SensorSample, Speedometer, SpeedometerConfig, TickClock,
    TickOutput, WheelEvent,
};
use spedo_oled_display_rs::{status_display_task, StatusDisplay, StatusDisplayConfig, StatusSignal};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C1 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Latest trip status snapshot, written by the main loop and consumed by the
/// OLED task.
static STATUS_FRAMES: StaticCell<StatusSignal> = StaticCell::new();

/// Pico 2 on-board flash.
const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Standard SSD1306 I2C address.
const OLED_ADDRESS: u8 = 0x3C;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type OledI2c = I2c<'static, I2C1, i2c::Async>;

type Odometer = OdometerStore<Flash<'static, FLASH, Blocking, FLASH_SIZE>>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `status_display_task` so it
/// can be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn oled_task(
    driver: StatusDisplay<OledI2c>,
    frames: &'static StatusSignal,
    config: StatusDisplayConfig,
) {
    status_display_task(driver, frames, config).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("spedo-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // REED     → GP22      (p.PIN_22)  active-low, pull-up enabled
    // LED      → GP25      (p.PIN_25)  high during the debounce dwell
    // SEG 0-13 → GP8-GP21  (p.PIN_8 .. p.PIN_21)  bit n of the mask → GP(8+n)
    // I2C_SDA  → GP26      (p.PIN_26)
    // I2C_SCL  → GP27      (p.PIN_27)
    // ———————————————————————————————————————————————————————————————————————

    let reed = Input::new(p.PIN_22, Pull::Up);
    let mut led = Output::new(p.PIN_25, Level::Low);

    let mut segments = SegmentBus::new([
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::Low),
    ]);

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c_oled = I2c::new_async(
        p.I2C1,
        p.PIN_27, // SCL
        p.PIN_26, // SDA
        Irqs,
        i2c_config,
    );
    let oled_driver = StatusDisplay::new(i2c_oled, OLED_ADDRESS);

    // —— Odometer ———————————————————————————————————————————————————————————

    let flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(p.FLASH);
    let mut odometer = match OdometerStore::last_sector(flash) {
        Ok(store) => Some(store),
        Err(e) => {
            error!("Odometer unavailable: {}", e);
            None
        }
    };

    let lifetime_m = match odometer.as_mut().and_then(|store| store.load()) {
        Some(m) => {
            info!("Odometer: {} m", m);
            m
        }
        None => {
            warn!("No odometer record; starting from 0 m");
            0
        }
    };

    let config = SpeedometerConfig::default();
    info!("Config: {}", config);
    let mut speedo = Speedometer::new(config).with_odometer(lifetime_m);
    segments.write(speedo.mask());

    // —— Spawn tasks ————————————————————————————————————————————————————————

    let frames: &'static StatusSignal = STATUS_FRAMES.init(Signal::new());
    frames.signal(speedo.status_frame());

    spawner
        .spawn(oled_task(oled_driver, frames, StatusDisplayConfig::default()))
        .unwrap();

    info!("All tasks spawned");

    // —— 1 ms main loop —————————————————————————————————————————————————————

    let mut ticker = Ticker::every(Duration::from_millis(1));
    let mut clock = TickClock::new(Instant::now().as_micros());

    loop {
        ticker.next().await;

        let due = clock.due_ticks(Instant::now().as_micros());
        if due > 1 {
            debug!("Catching up {} ticks", due);
        }

        let sample = SensorSample::from_active_low(reed.is_low());
        for _ in 0..due {
            let out = speedo.tick(sample);
            apply(&out, &speedo, &mut segments, &mut led, frames, &mut odometer);
        }
    }
}

/// Act on one tick's output: bus, LED, telemetry, status and odometer.
fn apply(
    out: &TickOutput,
    speedo: &Speedometer,
    segments: &mut SegmentBus<Output<'static>>,
    led: &mut Output<'static>,
    frames: &'static StatusSignal,
    odometer: &mut Option<Odometer>,
) {
    if let Some(mask) = out.mask {
        segments.write(mask);
    }
    led.set_level(Level::from(out.indicator));

    match out.event {
        Some(WheelEvent::RevolutionConfirmed { interval_ms }) => {
            let stats = speedo.stats();
            info!(
                "rev={} t={} ms speed={} km/h dist={} m",
                stats.revolutions,
                interval_ms,
                stats.current_speed_kmh,
                stats.distance_m()
            );
        }
        Some(WheelEvent::DisplayIdle) => {
            info!("Stopped after {} m", speedo.stats().distance_m());
        }
        Some(WheelEvent::DisplayOff) => {
            info!("Stationary; display off");
            if let Some(store) = odometer.as_mut() {
                if let Err(e) = store.save(speedo.lifetime_distance_m()) {
                    error!("Odometer save failed: {}", e);
                }
            }
        }
        Some(WheelEvent::ResumeFromIdle) => {
            info!("Moving again");
        }
        None => {}
    }

    if out.second_elapsed {
        frames.signal(speedo.status_frame());
    }
}
