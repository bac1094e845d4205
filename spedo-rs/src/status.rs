//! Text frame for the secondary status display.
//!
//! The frame is a fixed six-line layout built from [`TripStats`]; it carries
//! no drawing logic, so the display crate only has to place each line.
//!
//! ```text
//! Dist   12345 m
//! Time      42 min
//! Move      37 min
//! Avg       19 km/h
//! Max       41 km/h
//! Now   23 km/h 14 mph
//! ```

use core::fmt::Write;

use heapless::String;

use crate::config::SpeedometerConfig;
use crate::trip::TripStats;

/// Number of text lines in a status frame.
pub const STATUS_LINES: usize = 6;

/// Maximum characters per line; 21 glyphs of the 6×10 font span 126 px.
pub const STATUS_LINE_LEN: usize = 21;

/// Rendered text for one refresh of the status display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFrame {
    pub lines: [String<STATUS_LINE_LEN>; STATUS_LINES],
}

impl StatusFrame {
    /// Iterate over the lines as `&str`, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }
}

/// Format trip totals into the six-line layout.
///
/// Minutes are truncated. The current speed is repeated in mph using
/// `config.mph_per_kmh_percent`.
pub fn render_status(stats: &TripStats, config: &SpeedometerConfig) -> StatusFrame {
    let mut frame = StatusFrame::default();
    let [dist, time, moving, avg, max, now] = &mut frame.lines;

    // An overlong line is cut short; the rest of the frame is unaffected.
    let _ = write!(dist, "Dist {:>7} m", stats.distance_m());
    let _ = write!(time, "Time {:>7} min", stats.elapsed_min());
    let _ = write!(moving, "Move {:>7} min", stats.moving_min());
    let _ = write!(avg, "Avg  {:>7} km/h", stats.average_speed_kmh);
    let _ = write!(max, "Max  {:>7} km/h", stats.max_speed_kmh);
    let _ = write!(
        now,
        "Now  {:>3} km/h {:>2} mph",
        stats.current_speed_kmh,
        config.kmh_to_mph(stats.current_speed_kmh)
    );

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> TripStats {
        TripStats {
            distance_mm: 12_345_678,
            elapsed_s: 42 * 60 + 59,
            moving_s: 37 * 60,
            max_speed_kmh: 41,
            current_speed_kmh: 23,
            average_speed_kmh: 19,
            revolutions: 5534,
        }
    }

    #[test]
    fn renders_six_fields_in_order() {
        let frame = render_status(&stats(), &SpeedometerConfig::default());
        let lines: [&str; STATUS_LINES] = core::array::from_fn(|i| frame.lines[i].as_str());
        assert_eq!(
            lines,
            [
                "Dist   12345 m",
                "Time      42 min",
                "Move      37 min",
                "Avg       19 km/h",
                "Max       41 km/h",
                "Now   23 km/h 14 mph",
            ]
        );
    }

    #[test]
    fn startup_frame_shows_zeroes() {
        let frame = render_status(&TripStats::default(), &SpeedometerConfig::default());
        assert_eq!(frame.lines[0].as_str(), "Dist       0 m");
        assert_eq!(frame.lines[2].as_str(), "Move       0 min");
        assert_eq!(frame.lines[3].as_str(), "Avg        0 km/h");
        assert_eq!(frame.lines[5].as_str(), "Now    0 km/h  0 mph");
    }

    #[test]
    fn extreme_values_are_not_truncated() {
        let s = TripStats {
            distance_mm: u32::MAX as u64 * 1000,
            elapsed_s: u32::MAX,
            moving_s: u32::MAX,
            max_speed_kmh: 160,
            current_speed_kmh: 160,
            average_speed_kmh: 99,
            revolutions: u32::MAX,
        };
        let frame = render_status(&s, &SpeedometerConfig::default());
        assert!(frame.lines[0].ends_with(" m"));
        assert!(frame.lines[0].contains("4294967295"));
        assert!(frame.lines[5].ends_with("160 km/h 99 mph"));
    }

    #[test]
    fn identical_stats_give_identical_frames() {
        let config = SpeedometerConfig::default();
        assert_eq!(render_status(&stats(), &config), render_status(&stats(), &config));

        let mut faster = stats();
        faster.current_speed_kmh += 1;
        assert_ne!(render_status(&stats(), &config), render_status(&faster, &config));
    }

    #[test]
    fn lines_iterator_matches_storage() {
        let frame = render_status(&stats(), &SpeedometerConfig::default());
        assert_eq!(frame.lines().count(), STATUS_LINES);
        assert_eq!(frame.lines().next(), Some("Dist   12345 m"));
    }
}
