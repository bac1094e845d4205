//! Segment patterns for the two-digit display.
//!
//! The display is wired as 14 consecutive GPIO lines. Bit `n` of a
//! [`DisplayMask`] drives line `n` of the bus (GP8 + n on the stock board).
//! The two digits share no lines, so any tens pattern can be OR'd with any
//! units pattern.
//!
//! ```text
//!  bit: 13 12 11 10  9  8  7  6  5  4  3  2  1  0
//!       └─units──┘  └───────tens───────┘ └units─┘
//! ```
//!
//! Bit 7 is the middle bar of the tens digit, bit 3 the middle bar of the
//! units digit.

/// Bit mask of segment lines driven high.
pub type DisplayMask = u32;

/// Number of GPIO lines on the segment bus.
pub const SEGMENT_LINES: usize = 14;

/// Mask covering every line of the bus.
pub const ALL_SEGMENTS: DisplayMask = (1 << SEGMENT_LINES) - 1;

/// Tens-digit patterns, indexed by digit.
pub const TENS: [DisplayMask; 10] = [
    0b00011101110000,
    0b00010000010000,
    0b00001110110000,
    0b00011010110000,
    0b00010011010000,
    0b00011011100000,
    0b00011111100000,
    0b00010000110000,
    0b00011111110000,
    0b00010011110000,
];

/// Units-digit patterns, indexed by digit.
pub const UNITS: [DisplayMask; 10] = [
    0b11100000000111,
    0b10000000000001,
    0b01100000001011,
    0b11000000001011,
    0b10000000001101,
    0b11000000001110,
    0b11100000001110,
    0b10000000000011,
    0b11100000001111,
    0b10000000001111,
];

/// Middle bar of the tens digit.
pub const TENS_DASH: DisplayMask = 1 << 7;

/// Middle bar of the units digit.
pub const UNITS_DASH: DisplayMask = 1 << 3;

/// Pattern for `digit` in the tens position. Digits above 9 clamp to 9.
pub fn tens(digit: u32) -> DisplayMask {
    TENS[digit.min(9) as usize]
}

/// Pattern for `digit` in the units position. Digits above 9 clamp to 9.
pub fn units(digit: u32) -> DisplayMask {
    UNITS[digit.min(9) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_fit_on_the_bus() {
        for d in 0..10 {
            assert_eq!(TENS[d] & !ALL_SEGMENTS, 0);
            assert_eq!(UNITS[d] & !ALL_SEGMENTS, 0);
        }
    }

    #[test]
    fn tens_and_units_never_share_lines() {
        for t in TENS {
            for u in UNITS {
                assert_eq!(t & u, 0);
            }
        }
    }

    #[test]
    fn eight_lights_seven_segments_per_digit() {
        assert_eq!(TENS[8].count_ones(), 7);
        assert_eq!(UNITS[8].count_ones(), 7);
        assert_eq!(TENS[1].count_ones(), 2);
        assert_eq!(UNITS[1].count_ones(), 2);
    }

    #[test]
    fn dash_is_the_segment_zero_lacks() {
        assert_eq!(TENS[8] & !TENS[0], TENS_DASH);
        assert_eq!(UNITS[8] & !UNITS[0], UNITS_DASH);
    }

    #[test]
    fn out_of_range_digits_clamp() {
        assert_eq!(tens(12), TENS[9]);
        assert_eq!(units(42), UNITS[9]);
    }
}
