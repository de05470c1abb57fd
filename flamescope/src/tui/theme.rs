//! TUI color theme
//!
//! Dark terminal scheme. Bar colors come from the render engine as RGBA and
//! are composited onto [`BACKGROUND`] here, since terminal cells have no alpha.

use ratatui::style::Color;

use crate::render::Rgba;

pub const ACCENT_GREEN: Color = Color::Rgb(72, 206, 115);
pub const CRITICAL_RED: Color = Color::Rgb(235, 87, 87);
pub const CAUTION_AMBER: Color = Color::Rgb(255, 191, 0);
pub const INFO_DIM: Color = Color::Rgb(140, 140, 140);
pub const BACKGROUND: Color = Color::Rgb(24, 24, 28);

/// [`BACKGROUND`] as channels, for compositing
pub const BACKGROUND_RGB: (u8, u8, u8) = (24, 24, 28);

/// Composite a straight-alpha color over `base`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_over(color: Rgba, base: (u8, u8, u8)) -> Color {
    let a = color.a.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (f64::from(fg) * a + f64::from(bg) * (1.0 - a)).round() as u8;
    Color::Rgb(mix(color.r, base.0), mix(color.g, base.1), mix(color.b, base.2))
}

/// Color for a frame's share of the profile
/// - Above 40%: Critical (Red)
/// - Above 20%: Caution (Amber)
/// - Otherwise: Accent (Green)
#[must_use]
pub fn share_color(percentage: f64) -> Color {
    if percentage > 40.0 {
        CRITICAL_RED
    } else if percentage > 20.0 {
        CAUTION_AMBER
    } else {
        ACCENT_GREEN
    }
}
