/// Tuning values for the wheel detector, speed engine and renderers.
///
/// All timing and scaling knobs live here rather than in module-level
/// constants, so a different wheel or a different idle policy only needs a
/// different config at construction time.
///
/// [`SpeedometerConfig::default()`] matches the stock build: a 700×28c wheel
/// (2231 mm), 50 ms debounce dwell, idle dashes after 5 s and the "off"
/// indicator after 10 s without a revolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedometerConfig {
    /// Wheel circumference in millimetres. Default: 2231.
    pub wheel_circumference_mm: u32,
    /// Dwell after a confirmed closure before the switch is re-sampled.
    /// Default: 50 ms.
    pub debounce_hold_ms: u32,
    /// Time without a revolution after which the idle dashes are shown.
    /// Default: 5000 ms.
    pub idle_after_ms: u32,
    /// Time without a revolution after which the wheel is considered
    /// stationary. Must be larger than `idle_after_ms`. Default: 10000 ms.
    pub stationary_after_ms: u32,
    /// Duration of each frame of the wake-up sweep. Default: 10 ms.
    pub animation_frame_ms: u32,
    /// Miles-per-hour per km/h, in hundredths. Default: 62 (0.62).
    pub mph_per_kmh_percent: u32,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self {
            wheel_circumference_mm: 2231,
            debounce_hold_ms: 50,
            idle_after_ms: 5000,
            stationary_after_ms: 10_000,
            animation_frame_ms: 10,
            mph_per_kmh_percent: 62,
        }
    }
}

impl SpeedometerConfig {
    /// Total length of the wake-up sweep played when leaving `Stationary`.
    pub fn animation_total_ms(&self) -> u32 {
        self.animation_frame_ms * crate::seven_segment::RESUME_FRAMES.len() as u32
    }

    /// Convert a speed in km/h to mph using the configured factor,
    /// truncating toward zero.
    pub fn kmh_to_mph(&self, kmh: u32) -> u32 {
        (kmh as u64 * self.mph_per_kmh_percent as u64 / 100) as u32
    }
}
