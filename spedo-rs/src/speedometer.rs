//! The per-millisecond context that ties detection, trip maths and the
//! segment readout together.
//!
//! [`Speedometer`] owns every piece of mutable state in the system. The
//! firmware main loop feeds it one [`SensorSample`] per tick and applies the
//! returned [`TickOutput`] to the hardware; nothing else reads or writes the
//! state, so no locking is involved.

use crate::config::SpeedometerConfig;
use crate::detector::{FsmState, SensorSample, WheelEvent, WheelEventDetector};
use crate::segments::DisplayMask;
use crate::seven_segment::{render_readout, Readout};
use crate::status::{render_status, StatusFrame};
use crate::trip::{SpeedEngine, TripStats};

const MS_PER_SECOND: u32 = 1000;

/// Everything the hardware layer needs to act on after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Detector event raised this tick, if any.
    pub event: Option<WheelEvent>,
    /// New segment mask, present only when it differs from the last one.
    pub mask: Option<DisplayMask>,
    /// Level for the debounce indicator LED.
    pub indicator: bool,
    /// A trip-clock second completed; the status display is due a refresh.
    pub second_elapsed: bool,
}

/// Main-loop state: detector, speed engine and segment readout.
///
/// # Examples
///
/// ```
/// use spedo::{SensorSample, Speedometer, SpeedometerConfig, WheelEvent};
///
/// let mut speedo = Speedometer::new(SpeedometerConfig::default());
///
/// // One revolution every 400 ms with a 2231 mm wheel is 20 km/h.
/// for _ in 0..399 {
///     speedo.tick(SensorSample::Open);
/// }
/// let out = speedo.tick(SensorSample::Closed);
/// assert_eq!(out.event, Some(WheelEvent::RevolutionConfirmed { interval_ms: 400 }));
/// assert_eq!(speedo.stats().current_speed_kmh, 20);
/// ```
#[derive(Debug, Clone)]
pub struct Speedometer {
    config: SpeedometerConfig,
    detector: WheelEventDetector,
    engine: SpeedEngine,
    readout: Readout,
    mask: DisplayMask,
    ms_into_second: u32,
    odometer_base_m: u32,
}

impl Speedometer {
    /// Power-on state: `Open`, zeroed trip, "0" on the segments.
    pub fn new(config: SpeedometerConfig) -> Self {
        let readout = Readout::Speed(0);
        Self {
            detector: WheelEventDetector::new(&config),
            engine: SpeedEngine::new(config.wheel_circumference_mm),
            readout,
            mask: render_readout(readout),
            ms_into_second: 0,
            odometer_base_m: 0,
            config,
        }
    }

    /// Start lifetime distance counting from a previously stored value.
    pub fn with_odometer(mut self, base_m: u32) -> Self {
        self.odometer_base_m = base_m;
        self
    }

    /// Advance by one millisecond.
    pub fn tick(&mut self, sample: SensorSample) -> TickOutput {
        let event = self.detector.tick(sample);

        match event {
            Some(WheelEvent::RevolutionConfirmed { interval_ms }) => {
                let kmh = self.engine.on_revolution(interval_ms);
                self.readout = Readout::Speed(kmh);
            }
            Some(WheelEvent::DisplayIdle) => {
                self.engine.on_stopped();
                self.readout = Readout::Idle;
            }
            Some(WheelEvent::DisplayOff) => {
                self.engine.on_stopped();
                self.readout = Readout::Off;
            }
            Some(WheelEvent::ResumeFromIdle) | None => {}
        }

        if let Some(frame) = self.detector.animation_frame() {
            self.readout = Readout::ResumeFrame(frame);
        } else if let Readout::ResumeFrame(_) = self.readout {
            self.readout = Readout::ResumeDone;
        }

        let new_mask = render_readout(self.readout);
        let mask = if new_mask != self.mask {
            self.mask = new_mask;
            Some(new_mask)
        } else {
            None
        };

        self.ms_into_second += 1;
        let second_elapsed = self.ms_into_second >= MS_PER_SECOND;
        if second_elapsed {
            self.ms_into_second -= MS_PER_SECOND;
            self.engine.on_second(self.detector.state());
        }

        TickOutput {
            event,
            mask,
            indicator: self.detector.indicator_on(),
            second_elapsed,
        }
    }

    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }

    pub fn state(&self) -> FsmState {
        self.detector.state()
    }

    /// Milliseconds since the last confirmed revolution.
    pub fn elapsed_ms(&self) -> u32 {
        self.detector.elapsed_ms()
    }

    pub fn stats(&self) -> &TripStats {
        self.engine.stats()
    }

    pub fn readout(&self) -> Readout {
        self.readout
    }

    /// Segment mask currently expected on the bus.
    pub fn mask(&self) -> DisplayMask {
        self.mask
    }

    /// Stored distance plus this trip, in metres.
    pub fn lifetime_distance_m(&self) -> u32 {
        self.odometer_base_m
            .saturating_add(self.engine.stats().distance_m())
    }

    /// Snapshot of the status display text.
    pub fn status_frame(&self) -> StatusFrame {
        render_status(self.engine.stats(), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{TENS, UNITS};
    use crate::seven_segment::{IDLE_MASK, OFF_MASK, RESUME_DONE_MASK, RESUME_FRAMES};

    use SensorSample::{Closed, Open};

    fn speedo() -> Speedometer {
        Speedometer::new(SpeedometerConfig::default())
    }

    /// Run `ms` ticks, collecting every event and mask change.
    fn run(
        s: &mut Speedometer,
        sample: SensorSample,
        ms: u32,
        events: &mut heapless::Vec<WheelEvent, 64>,
        masks: &mut heapless::Vec<DisplayMask, 64>,
    ) {
        for _ in 0..ms {
            let out = s.tick(sample);
            if let Some(e) = out.event {
                events.push(e).unwrap();
            }
            if let Some(m) = out.mask {
                masks.push(m).unwrap();
            }
        }
    }

    /// One full wheel revolution: a 5 ms closure then open until `period_ms`.
    fn revolution(s: &mut Speedometer, period_ms: u32) {
        for i in 0..period_ms {
            s.tick(if i < 5 { Closed } else { Open });
        }
    }

    #[test]
    fn power_on_shows_zero() {
        let s = speedo();
        assert_eq!(s.readout(), Readout::Speed(0));
        assert_eq!(s.mask(), UNITS[0]);
        assert_eq!(s.state(), FsmState::Open);
        assert_eq!(s.stats().moving_s, 1);
    }

    #[test]
    fn steady_riding_updates_display_and_distance() {
        let mut s = speedo();
        // First closure arrives at t = 1.
        revolution(&mut s, 268);
        for _ in 0..20 {
            revolution(&mut s, 268);
        }
        assert_eq!(s.stats().revolutions, 21);
        assert_eq!(s.stats().distance_mm, 21 * 2231);
        assert_eq!(s.stats().current_speed_kmh, 29);
        assert_eq!(s.mask(), TENS[2] | UNITS[9]);
    }

    #[test]
    fn mask_reported_only_on_change() {
        let mut s = speedo();
        let mut events = heapless::Vec::new();
        let mut masks = heapless::Vec::new();
        run(&mut s, Open, 399, &mut events, &mut masks);
        assert!(masks.is_empty());

        run(&mut s, Closed, 1, &mut events, &mut masks);
        assert_eq!(masks.as_slice(), &[TENS[2] | UNITS[0]]);

        // Same interval, same speed: no rewrite.
        run(&mut s, Open, 399, &mut events, &mut masks);
        run(&mut s, Closed, 1, &mut events, &mut masks);
        assert_eq!(masks.len(), 1);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn indicator_follows_dwell() {
        let mut s = speedo();
        assert!(!s.tick(Open).indicator);
        assert!(s.tick(Closed).indicator);
        for _ in 0..49 {
            assert!(s.tick(Open).indicator);
        }
        assert!(!s.tick(Open).indicator);
    }

    #[test]
    fn idle_then_off_sequence() {
        let mut s = speedo();
        revolution(&mut s, 300);
        let distance = s.stats().distance_mm;
        let max = s.stats().max_speed_kmh;

        let mut events = heapless::Vec::new();
        let mut masks = heapless::Vec::new();
        // The closure above happened at t = 1, so the idle point is 5001 ms
        // after it.
        run(&mut s, Open, 5001 - 299, &mut events, &mut masks);
        assert_eq!(events.as_slice(), &[WheelEvent::DisplayIdle]);
        assert_eq!(masks.as_slice(), &[IDLE_MASK]);
        assert_eq!(s.stats().current_speed_kmh, 0);

        run(&mut s, Open, 5000, &mut events, &mut masks);
        assert_eq!(
            events.as_slice(),
            &[WheelEvent::DisplayIdle, WheelEvent::DisplayOff]
        );
        assert_eq!(masks.as_slice(), &[IDLE_MASK, OFF_MASK]);
        assert_eq!(s.state(), FsmState::Stationary);
        assert_eq!(s.stats().distance_mm, distance);
        assert_eq!(s.stats().max_speed_kmh, max);
    }

    #[test]
    fn resume_plays_sweep_then_zero() {
        let mut s = speedo();
        let mut events = heapless::Vec::new();
        let mut masks = heapless::Vec::new();
        run(&mut s, Open, 10_001, &mut events, &mut masks);
        assert_eq!(s.state(), FsmState::Stationary);
        events.clear();
        masks.clear();

        run(&mut s, Closed, 1, &mut events, &mut masks);
        run(&mut s, Open, 80, &mut events, &mut masks);
        assert_eq!(events.as_slice(), &[WheelEvent::ResumeFromIdle]);

        let mut expected: heapless::Vec<DisplayMask, 64> =
            RESUME_FRAMES.iter().copied().collect();
        expected.push(RESUME_DONE_MASK).unwrap();
        assert_eq!(masks, expected);
        assert_eq!(s.elapsed_ms(), 80);
        assert_eq!(s.readout(), Readout::ResumeDone);
        assert_eq!(s.stats().revolutions, 0);

        // Next revolution measures from the start of the sweep.
        run(&mut s, Open, 319, &mut events, &mut masks);
        let out = s.tick(Closed);
        assert_eq!(
            out.event,
            Some(WheelEvent::RevolutionConfirmed { interval_ms: 400 })
        );
        assert_eq!(out.mask, Some(TENS[2] | UNITS[0]));
    }

    #[test]
    fn seconds_advance_trip_clock() {
        let mut s = speedo();
        let mut seconds = 0;
        for _ in 0..3500 {
            if s.tick(Open).second_elapsed {
                seconds += 1;
            }
        }
        assert_eq!(seconds, 3);
        assert_eq!(s.stats().elapsed_s, 3);
        assert_eq!(s.stats().moving_s, 4);
    }

    #[test]
    fn stationary_time_is_not_moving_time() {
        let mut s = speedo();
        for _ in 0..30_000 {
            s.tick(Open);
        }
        assert_eq!(s.stats().elapsed_s, 30);
        // Open for the first 10 seconds only.
        assert_eq!(s.stats().moving_s, 11);
    }

    #[test]
    fn dwell_and_sweep_time_reach_trip_clock() {
        let mut s = speedo();
        for _ in 0..10_001 {
            s.tick(Open);
        }
        // 999 ms of closed switch: sweep plus repeated dwells.
        for _ in 0..999 {
            s.tick(Closed);
        }
        assert_eq!(s.stats().elapsed_s, 11);
    }

    #[test]
    fn average_speed_after_steady_minute() {
        let mut s = speedo();
        for _ in 0..150 {
            revolution(&mut s, 400);
        }
        let st = s.stats();
        assert_eq!(st.elapsed_s, 60);
        assert_eq!(st.moving_s, 61);
        assert_eq!(st.distance_mm, 150 * 2231);
        assert_eq!(st.average_speed_kmh, (150 * 2231 * 36 / (61 * 10_000)) as u32);
    }

    #[test]
    fn lifetime_distance_adds_trip() {
        let mut s = speedo().with_odometer(1_000);
        for _ in 0..10 {
            revolution(&mut s, 400);
        }
        assert_eq!(s.lifetime_distance_m(), 1_022);
    }

    #[test]
    fn status_frame_reflects_stats() {
        let mut s = speedo();
        for _ in 0..3 {
            revolution(&mut s, 400);
        }
        let frame = s.status_frame();
        assert_eq!(frame.lines[0].as_str(), "Dist       6 m");
        assert_eq!(frame.lines[5].as_str(), "Now   20 km/h 12 mph");
    }
}
