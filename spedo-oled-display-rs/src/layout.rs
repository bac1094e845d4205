//! Status layout geometry and text placement.
//!
//! This module defines [`StatusDisplayConfig`], the [`draw_text_at`]
//! primitive and [`render_status_frame`], which places the six lines of a
//! [`StatusFrame`] using `embedded-graphics`.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use spedo::StatusFrame;

// ── StatusDisplayConfig ──────────────────────────────────────────────────

/// Geometry and refresh limit for the status display.
///
/// All layout geometry lives here; there are no module-level layout
/// constants. [`StatusDisplayConfig::default()`] fits six lines of the
/// 6×10 font on a 128×64 panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusDisplayConfig {
    /// Maximum redraw rate in Hz. Default: 1. The panel needs ~20 ms of
    /// I2C traffic per frame.
    pub max_refresh_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// X coordinate of the left edge of every line. Default: 1.
    pub margin_x: i32,
    /// Y coordinate of the top of the first line. Default: 2.
    pub first_line_y: i32,
    /// Vertical distance between line tops. Default: 10.
    pub line_height: i32,
    /// Font scale passed to [`draw_text_at`]. Default: 1.
    pub text_scale: u8,
}

impl Default for StatusDisplayConfig {
    fn default() -> Self {
        Self {
            max_refresh_hz: 1,
            display_width: 128,
            display_height: 64,
            margin_x: 1,
            first_line_y: 2,
            line_height: 10,
            text_scale: 1,
        }
    }
}

impl StatusDisplayConfig {
    /// Minimum time between redraws in milliseconds.
    ///
    /// Formula: `1000 / max_refresh_hz`. A rate of 0 is treated as 1 Hz.
    pub fn refresh_period_ms(&self) -> u64 {
        1000 / self.max_refresh_hz.max(1) as u64
    }

    /// Top-left corner of line `index`.
    pub fn line_origin(&self, index: usize) -> Point {
        Point::new(
            self.margin_x,
            self.first_line_y + index as i32 * self.line_height,
        )
    }
}

// ── Text primitive ───────────────────────────────────────────────────────

/// Font used for a given text scale. Scale 1 is 6×10, anything larger is
/// 10×20.
pub fn font_for_scale(scale: u8) -> &'static MonoFont<'static> {
    if scale <= 1 {
        &FONT_6X10
    } else {
        &FONT_10X20
    }
}

/// Draw `text` with its top-left corner at `(x, y)`.
///
/// Glyphs falling outside the target are clipped by `embedded-graphics`.
pub fn draw_text_at<D>(
    display: &mut D,
    x: i32,
    y: i32,
    scale: u8,
    text: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font_for_scale(scale), BinaryColor::On);
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(display)?;
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Render a [`StatusFrame`] to a display buffer.
///
/// # Layout
///
/// ```text
/// ┌────────────────────────────┐
/// │Dist   12345 m              │  ← first_line_y
/// │Time      42 min            │
/// │Move      37 min            │  ← + line_height per row
/// │Avg       19 km/h           │
/// │Max       41 km/h           │
/// │Now   23 km/h 14 mph        │
/// └────────────────────────────┘
/// ```
///
/// The caller clears the buffer first; this only sets pixels.
pub fn render_status_frame<D>(
    display: &mut D,
    frame: &StatusFrame,
    config: &StatusDisplayConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for (i, line) in frame.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let origin = config.line_origin(i);
        draw_text_at(display, origin.x, origin.y, config.text_scale, line)?;
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use spedo::{render_status, SpeedometerConfig, TripStats};

    /// 128×64 monochrome frame buffer that records out-of-bounds draws.
    struct FrameBuffer {
        pixels: [[bool; 128]; 64],
        clipped: u32,
    }

    impl FrameBuffer {
        fn new() -> Self {
            Self {
                pixels: [[false; 128]; 64],
                clipped: 0,
            }
        }

        fn lit_rows(&self) -> impl Iterator<Item = usize> + '_ {
            (0..64).filter(move |&y| self.pixels[y].iter().any(|&p| p))
        }

        fn lit_count(&self) -> usize {
            self.pixels.iter().flatten().filter(|&&p| p).count()
        }
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for FrameBuffer {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, c) in pixels {
                if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                    self.pixels[p.y as usize][p.x as usize] = c.is_on();
                } else {
                    self.clipped += 1;
                }
            }
            Ok(())
        }
    }

    fn frame() -> StatusFrame {
        let stats = TripStats {
            distance_mm: 12_345_678,
            elapsed_s: 2580,
            moving_s: 2220,
            max_speed_kmh: 41,
            current_speed_kmh: 23,
            average_speed_kmh: 19,
            revolutions: 5534,
        };
        render_status(&stats, &SpeedometerConfig::default())
    }

    #[test]
    fn default_config_values() {
        let c = StatusDisplayConfig::default();
        assert_eq!(c.max_refresh_hz, 1);
        assert_eq!(c.display_width, 128);
        assert_eq!(c.display_height, 64);
        assert_eq!(c.margin_x, 1);
        assert_eq!(c.first_line_y, 2);
        assert_eq!(c.line_height, 10);
        assert_eq!(c.text_scale, 1);
    }

    #[test]
    fn refresh_period_1hz() {
        assert_eq!(StatusDisplayConfig::default().refresh_period_ms(), 1000);
    }

    #[test]
    fn refresh_period_4hz_and_zero() {
        let fast = StatusDisplayConfig {
            max_refresh_hz: 4,
            ..StatusDisplayConfig::default()
        };
        assert_eq!(fast.refresh_period_ms(), 250);

        let zero = StatusDisplayConfig {
            max_refresh_hz: 0,
            ..StatusDisplayConfig::default()
        };
        assert_eq!(zero.refresh_period_ms(), 1000);
    }

    #[test]
    fn six_lines_fit_on_panel() {
        let c = StatusDisplayConfig::default();
        let last = c.line_origin(spedo::status::STATUS_LINES - 1);
        let glyph = font_for_scale(c.text_scale).character_size;
        assert!(last.y + glyph.height as i32 <= c.display_height as i32);

        let widest = spedo::status::STATUS_LINE_LEN as u32 * glyph.width;
        assert!(c.margin_x as u32 + widest <= c.display_width);
    }

    #[test]
    fn font_selection_by_scale() {
        assert_eq!(font_for_scale(0).character_size, Size::new(6, 10));
        assert_eq!(font_for_scale(1).character_size, Size::new(6, 10));
        assert_eq!(font_for_scale(2).character_size, Size::new(10, 20));
        assert_eq!(font_for_scale(9).character_size, Size::new(10, 20));
    }

    #[test]
    fn draw_text_at_places_top_left() {
        let mut fb = FrameBuffer::new();
        draw_text_at(&mut fb, 10, 20, 1, "8").unwrap();
        let first = fb.lit_rows().next().unwrap();
        let last = fb.lit_rows().last().unwrap();
        assert!(first >= 20);
        assert!(last < 30);
    }

    #[test]
    fn render_frame_stays_in_bounds() {
        let mut fb = FrameBuffer::new();
        render_status_frame(&mut fb, &frame(), &StatusDisplayConfig::default()).unwrap();
        assert_eq!(fb.clipped, 0);
        assert!(fb.lit_count() > 0);
        assert!(fb.lit_rows().all(|y| y >= 2));
    }

    #[test]
    fn empty_frame_draws_nothing() {
        let mut fb = FrameBuffer::new();
        render_status_frame(&mut fb, &StatusFrame::default(), &StatusDisplayConfig::default())
            .unwrap();
        assert_eq!(fb.lit_count(), 0);
    }
}
