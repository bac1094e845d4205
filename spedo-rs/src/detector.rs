//! Debounced wheel-revolution detection.
//!
//! [`WheelEventDetector`] runs once per millisecond against the current reed
//! switch reading and turns a chattering contact into clean
//! [`WheelEvent`]s.
//!
//! # Transition table
//!
//! ```text
//! state            sample   condition              next             event
//! ---------------  -------  ---------------------  ---------------  -----------------------
//! Open             closed   -                      DebounceHold     RevolutionConfirmed(t)
//! Open             open     t > stationary_after   Stationary       DisplayOff
//! Open             open     t == idle_after + 1    Open             DisplayIdle
//! Open             open     otherwise              Open             -
//! DebounceHold     any      animation running      DebounceHold     -
//! DebounceHold     any      dwell not finished     DebounceHold     -
//! DebounceHold     closed   dwell finished         DebounceHold     - (dwell restarts)
//! DebounceHold     open     dwell finished         Open             -
//! DebounceRelease  closed   -                      DebounceHold     -
//! DebounceRelease  open     -                      Open             -
//! Stationary       closed   -                      DebounceHold     ResumeFromIdle
//! Stationary       open     -                      Stationary       -
//! ```
//!
//! The dwell ends by passing through `DebounceRelease` within the same tick,
//! so the switch is re-sampled exactly `debounce_hold_ms` after the closure.
//! `t` is reset when a revolution is confirmed; the dwell and the wake-up
//! sweep both count toward the following interval.

use crate::config::SpeedometerConfig;

/// A single reading of the reed switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorSample {
    /// Magnet away, contact open.
    Open,
    /// Magnet present, contact closed.
    Closed,
}

impl SensorSample {
    /// Interpret a pulled-up input where a closed switch reads low.
    pub fn from_active_low(is_low: bool) -> Self {
        if is_low {
            SensorSample::Closed
        } else {
            SensorSample::Open
        }
    }

    pub fn is_closed(self) -> bool {
        self == SensorSample::Closed
    }
}

/// Detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsmState {
    /// Waiting for the magnet.
    Open,
    /// Magnet seen; ignoring the switch until the dwell expires.
    DebounceHold,
    /// Dwell expired; deciding whether the magnet has left.
    DebounceRelease,
    /// No revolution for a long time; timeouts disabled.
    Stationary,
}

/// Transitions reported by [`WheelEventDetector::tick()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelEvent {
    /// A new closure was accepted. `interval_ms` is the time since the
    /// previous one.
    RevolutionConfirmed { interval_ms: u32 },
    /// No revolution for `idle_after_ms`; the wheel is probably stopped.
    DisplayIdle,
    /// No revolution for `stationary_after_ms`; entered `Stationary`.
    DisplayOff,
    /// The wheel moved again after `Stationary`; the wake-up sweep starts.
    ResumeFromIdle,
}

/// Reed switch state machine.
///
/// Owns the tick counter `t` together with the [`FsmState`] so the two can
/// only change together.
///
/// # Examples
///
/// ```
/// use spedo::{SensorSample, SpeedometerConfig, WheelEvent, WheelEventDetector};
///
/// let mut det = WheelEventDetector::new(&SpeedometerConfig::default());
/// for _ in 0..499 {
///     assert_eq!(det.tick(SensorSample::Open), None);
/// }
/// assert_eq!(
///     det.tick(SensorSample::Closed),
///     Some(WheelEvent::RevolutionConfirmed { interval_ms: 500 })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct WheelEventDetector {
    state: FsmState,
    t_ms: u32,
    hold_remaining_ms: u32,
    animation_remaining_ms: u32,
    debounce_hold_ms: u32,
    idle_after_ms: u32,
    stationary_after_ms: u32,
    animation_frame_ms: u32,
    animation_total_ms: u32,
}

impl WheelEventDetector {
    /// Start in `Open` with `t = 0`.
    pub fn new(config: &SpeedometerConfig) -> Self {
        Self {
            state: FsmState::Open,
            t_ms: 0,
            hold_remaining_ms: 0,
            animation_remaining_ms: 0,
            debounce_hold_ms: config.debounce_hold_ms.max(1),
            idle_after_ms: config.idle_after_ms,
            stationary_after_ms: config.stationary_after_ms,
            animation_frame_ms: config.animation_frame_ms.max(1),
            animation_total_ms: config.animation_total_ms(),
        }
    }

    pub fn state(&self) -> FsmState {
        self.state
    }

    /// Milliseconds since the last confirmed revolution.
    pub fn elapsed_ms(&self) -> u32 {
        self.t_ms
    }

    /// `true` while the debounce dwell is running. The wake-up sweep
    /// does not light the indicator.
    pub fn indicator_on(&self) -> bool {
        self.state == FsmState::DebounceHold && self.animation_remaining_ms == 0
    }

    /// Index of the wake-up sweep frame currently on screen, or `None`
    /// when no sweep is playing.
    pub fn animation_frame(&self) -> Option<usize> {
        if self.animation_remaining_ms == 0 {
            return None;
        }
        let played = self.animation_total_ms - self.animation_remaining_ms;
        Some((played / self.animation_frame_ms) as usize)
    }

    /// Advance by one millisecond with the given switch reading.
    pub fn tick(&mut self, sample: SensorSample) -> Option<WheelEvent> {
        self.t_ms = self.t_ms.saturating_add(1);

        match self.state {
            FsmState::Open => self.tick_open(sample),
            FsmState::DebounceHold => self.tick_hold(sample),
            FsmState::DebounceRelease => {
                self.release(sample);
                None
            }
            FsmState::Stationary => {
                if sample.is_closed() {
                    self.t_ms = 0;
                    self.animation_remaining_ms = self.animation_total_ms;
                    self.enter_hold();
                    Some(WheelEvent::ResumeFromIdle)
                } else {
                    None
                }
            }
        }
    }

    fn tick_open(&mut self, sample: SensorSample) -> Option<WheelEvent> {
        if sample.is_closed() {
            let interval_ms = self.t_ms;
            self.t_ms = 0;
            self.enter_hold();
            Some(WheelEvent::RevolutionConfirmed { interval_ms })
        } else if self.t_ms > self.stationary_after_ms {
            self.state = FsmState::Stationary;
            Some(WheelEvent::DisplayOff)
        } else if self.t_ms == self.idle_after_ms.saturating_add(1) {
            Some(WheelEvent::DisplayIdle)
        } else {
            None
        }
    }

    fn tick_hold(&mut self, sample: SensorSample) -> Option<WheelEvent> {
        if self.animation_remaining_ms > 0 {
            self.animation_remaining_ms -= 1;
            return None;
        }

        self.hold_remaining_ms = self.hold_remaining_ms.saturating_sub(1);
        if self.hold_remaining_ms == 0 {
            self.state = FsmState::DebounceRelease;
            self.release(sample);
        }
        None
    }

    fn release(&mut self, sample: SensorSample) {
        if sample.is_closed() {
            self.enter_hold();
        } else {
            self.state = FsmState::Open;
        }
    }

    fn enter_hold(&mut self) {
        self.state = FsmState::DebounceHold;
        self.hold_remaining_ms = self.debounce_hold_ms;
    }
}
