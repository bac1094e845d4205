//! Two-digit speed readout: mask rendering and the GPIO segment bus.

use embedded_hal::digital::OutputPin;

use crate::segments::{self, DisplayMask, SEGMENT_LINES, TENS_DASH, UNITS_DASH};

/// Wake-up sweep played when the wheel moves after `Stationary`: one
/// segment per frame, walking around the outer ring of both digits.
pub const RESUME_FRAMES: [DisplayMask; 8] = [
    1 << 0,
    1 << 1,
    1 << 5,
    1 << 6,
    1 << 7,
    1 << 8,
    1 << 11,
    1 << 12,
];

/// "--": shown once the wheel is probably stopped. Never blank, since an
/// unlit display draws so little current that some power banks cut out.
pub const IDLE_MASK: DisplayMask = TENS_DASH | UNITS_DASH;

/// "-": shown once the wheel is stationary.
pub const OFF_MASK: DisplayMask = UNITS_DASH;

/// "00": shown when the wake-up sweep finishes.
pub const RESUME_DONE_MASK: DisplayMask = segments::TENS[0] | segments::UNITS[0];

/// Highest speed the two digits can show.
pub const MAX_DISPLAY_KMH: u32 = 99;

/// What the segment display is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readout {
    /// Speed in km/h; saturates at [`MAX_DISPLAY_KMH`].
    Speed(u32),
    Idle,
    Off,
    /// Frame `n` of [`RESUME_FRAMES`].
    ResumeFrame(usize),
    /// Wake-up sweep finished.
    ResumeDone,
}

/// Render a readout to the segment mask.
///
/// ```
/// use spedo::{render_readout, segments, Readout};
///
/// assert_eq!(render_readout(Readout::Speed(7)), segments::UNITS[7]);
/// assert_eq!(
///     render_readout(Readout::Speed(42)),
///     segments::TENS[4] | segments::UNITS[2]
/// );
/// ```
pub fn render_readout(readout: Readout) -> DisplayMask {
    match readout {
        Readout::Speed(kmh) => {
            let kmh = kmh.min(MAX_DISPLAY_KMH);
            if kmh >= 10 {
                segments::tens(kmh / 10) | segments::units(kmh % 10)
            } else {
                segments::units(kmh)
            }
        }
        Readout::Idle => IDLE_MASK,
        Readout::Off => OFF_MASK,
        Readout::ResumeFrame(n) => RESUME_FRAMES[n.min(RESUME_FRAMES.len() - 1)],
        Readout::ResumeDone => RESUME_DONE_MASK,
    }
}

/// The 14 segment lines, driven as one mask.
///
/// Every write clears the lines lit by the previous mask before setting the
/// new ones, so no stale segment survives a frame. Pin errors are ignored:
/// the display is output-only and the next frame rewrites it anyway.
pub struct SegmentBus<P> {
    pins: [P; SEGMENT_LINES],
    mask: DisplayMask,
}

impl<P> SegmentBus<P>
where
    P: OutputPin,
{
    /// Take ownership of the lines, bit 0 first, and drive them all low.
    pub fn new(pins: [P; SEGMENT_LINES]) -> Self {
        let mut bus = Self {
            pins,
            mask: segments::ALL_SEGMENTS,
        };
        bus.write(0);
        bus
    }

    /// Mask currently on the lines.
    pub fn mask(&self) -> DisplayMask {
        self.mask
    }

    /// Replace the displayed mask.
    pub fn write(&mut self, mask: DisplayMask) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if self.mask & (1 << bit) != 0 {
                let _ = pin.set_low();
            }
        }
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if mask & (1 << bit) != 0 {
                let _ = pin.set_high();
            }
        }
        self.mask = mask;
    }

    /// Release the pins.
    pub fn free(self) -> [P; SEGMENT_LINES] {
        self.pins
    }
}
