//! Tick ↔ pixel mapping for the current zoom window
//!
//! ```text
//!   tick:  0 ─────── numTicks*rangeMin ════════ numTicks*rangeMax ─────── numTicks
//!                            │                          │
//!   x:                       0 ──────────────────────── W
//! ```
//!
//! Built fresh from the flamebearer and view state for every render or
//! hit-test; it holds nothing that outlives a pass.

#![allow(clippy::cast_precision_loss)]

use crate::flamebearer::Frame;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickTransform {
    num_ticks: f64,
    range_min: f64,
    range_max: f64,
    width: f64,
}

impl TickTransform {
    #[must_use]
    pub fn new(num_ticks: u64, range_min: f64, range_max: f64, width: f64) -> Self {
        Self { num_ticks: num_ticks as f64, range_min, range_max, width }
    }

    /// Logical surface width `W`
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// `W / numTicks / (rangeMax - rangeMin)`; zero for an empty profile or a
    /// degenerate range.
    #[must_use]
    pub fn pixels_per_tick(&self) -> f64 {
        let span = self.range_max - self.range_min;
        if self.num_ticks <= 0.0 || span <= 0.0 {
            return 0.0;
        }
        self.width / self.num_ticks / span
    }

    /// First tick visible at `x = 0`
    #[must_use]
    pub fn visible_start_tick(&self) -> f64 {
        self.num_ticks * self.range_min
    }

    #[must_use]
    pub fn tick_to_x(&self, tick: u64) -> f64 {
        (tick as f64 - self.visible_start_tick()) * self.pixels_per_tick()
    }

    /// Inverse of [`tick_to_x`](Self::tick_to_x)
    #[must_use]
    pub fn x_to_tick(&self, x: f64) -> f64 {
        let ppt = self.pixels_per_tick();
        if ppt <= 0.0 {
            return self.visible_start_tick();
        }
        x / ppt + self.visible_start_tick()
    }

    /// Pixel interval `[x0, x1]` covered by a frame
    #[must_use]
    pub fn span_to_x(&self, frame: &Frame) -> (f64, f64) {
        (self.tick_to_x(frame.start), self.tick_to_x(frame.end()))
    }

    /// Pixel width of `ticks` ticks
    #[must_use]
    pub fn ticks_to_width(&self, ticks: u64) -> f64 {
        ticks as f64 * self.pixels_per_tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_zoom_maps_full_width() {
        let t = TickTransform::new(100, 0.0, 1.0, 500.0);
        assert!((t.pixels_per_tick() - 5.0).abs() < 1e-9);
        assert!((t.tick_to_x(0)).abs() < 1e-9);
        assert!((t.tick_to_x(100) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoomed_window_shifts_origin() {
        let t = TickTransform::new(100, 0.4, 0.6, 200.0);
        assert!((t.pixels_per_tick() - 10.0).abs() < 1e-9);
        assert!((t.tick_to_x(40)).abs() < 1e-9);
        assert!((t.tick_to_x(60) - 200.0).abs() < 1e-9);
        assert!((t.tick_to_x(30) + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_x_to_tick_inverts() {
        let t = TickTransform::new(1000, 0.25, 0.75, 800.0);
        for tick in [250u64, 300, 512, 750] {
            let back = t.x_to_tick(t.tick_to_x(tick));
            assert!((back - tick as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_profile_is_degenerate_not_infinite() {
        let t = TickTransform::new(0, 0.0, 1.0, 500.0);
        assert!(t.pixels_per_tick().abs() < f64::EPSILON);
        assert!(t.tick_to_x(10).is_finite());
    }

    #[test]
    fn test_span_to_x() {
        let t = TickTransform::new(100, 0.0, 1.0, 100.0);
        let (x0, x1) = t.span_to_x(&Frame::new(40, 20, 20, 0));
        assert!((x0 - 40.0).abs() < 1e-9);
        assert!((x1 - 60.0).abs() < 1e-9);
    }
}
