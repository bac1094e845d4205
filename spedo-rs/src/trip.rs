//! Speed and trip aggregates derived from revolution timing.

use crate::detector::FsmState;

/// Trip totals since power-on.
///
/// Distance is tracked in millimetres so that `n` revolutions add up to
/// exactly `n × circumference` with no rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TripStats {
    /// Distance covered, in millimetres.
    pub distance_mm: u64,
    /// Seconds since power-on.
    pub elapsed_s: u32,
    /// Seconds spent outside `Stationary`. Starts at 1.
    pub moving_s: u32,
    /// Highest speed seen, km/h.
    pub max_speed_kmh: u32,
    /// Speed from the latest revolution, km/h. Zeroed by idle/off.
    pub current_speed_kmh: u32,
    /// `floor(3.6 × distance_m / moving_s)`, refreshed once per second.
    pub average_speed_kmh: u32,
    /// Confirmed revolutions.
    pub revolutions: u32,
}

impl Default for TripStats {
    fn default() -> Self {
        Self {
            distance_mm: 0,
            elapsed_s: 0,
            // Keeps the average well-defined before the first second of motion.
            moving_s: 1,
            max_speed_kmh: 0,
            current_speed_kmh: 0,
            average_speed_kmh: 0,
            revolutions: 0,
        }
    }
}

impl TripStats {
    /// Whole metres covered.
    pub fn distance_m(&self) -> u32 {
        (self.distance_mm / 1000) as u32
    }

    pub fn elapsed_min(&self) -> u32 {
        self.elapsed_s / 60
    }

    pub fn moving_min(&self) -> u32 {
        self.moving_s / 60
    }
}

/// `floor(circumference_m × 3600 / interval_ms)`, i.e. km/h for one wheel
/// revolution taking `interval_ms`. An interval of 0 is treated as 1 ms.
///
/// ```
/// assert_eq!(spedo::speed_kmh(2231, 893), 8);
/// assert_eq!(spedo::speed_kmh(2231, 200), 40);
/// ```
pub fn speed_kmh(circumference_mm: u32, interval_ms: u32) -> u32 {
    // mm/ms × 3.6 = km/h
    let num = circumference_mm as u64 * 36;
    let den = interval_ms.max(1) as u64 * 10;
    (num / den) as u32
}

/// `floor(3.6 × distance_m / moving_s)` with distance in millimetres.
pub fn average_speed_kmh(distance_mm: u64, moving_s: u32) -> u32 {
    // 3.6 × (mm / 1000) / s = 36 × mm / (10000 × s)
    (distance_mm * 36 / (moving_s.max(1) as u64 * 10_000)) as u32
}

/// Applies wheel events and the once-per-second clock to [`TripStats`].
#[derive(Debug, Clone)]
pub struct SpeedEngine {
    circumference_mm: u32,
    stats: TripStats,
}

impl SpeedEngine {
    pub fn new(circumference_mm: u32) -> Self {
        Self {
            circumference_mm,
            stats: TripStats::default(),
        }
    }

    pub fn stats(&self) -> &TripStats {
        &self.stats
    }

    /// Record one confirmed revolution that took `interval_ms`.
    ///
    /// Returns the new instantaneous speed in km/h.
    pub fn on_revolution(&mut self, interval_ms: u32) -> u32 {
        let speed = speed_kmh(self.circumference_mm, interval_ms);
        let s = &mut self.stats;
        s.distance_mm += self.circumference_mm as u64;
        s.max_speed_kmh = s.max_speed_kmh.max(speed);
        s.current_speed_kmh = speed;
        s.revolutions = s.revolutions.saturating_add(1);
        speed
    }

    /// The wheel has stopped (idle or off). Distance and max are kept.
    pub fn on_stopped(&mut self) {
        self.stats.current_speed_kmh = 0;
    }

    /// Advance the trip clock by one second.
    pub fn on_second(&mut self, state: FsmState) {
        let s = &mut self.stats;
        s.elapsed_s = s.elapsed_s.saturating_add(1);
        if state != FsmState::Stationary {
            s.moving_s = s.moving_s.saturating_add(1);
        }
        s.average_speed_kmh = average_speed_kmh(s.distance_mm, s.moving_s);
    }
}
