//! Drawing surface abstraction
//!
//! The render engine speaks in logical pixels through [`Surface`]. Two
//! backends exist:
//!
//! - [`RecordingSurface`]: captures a serializable display list in backing
//!   pixels (logical × pixel ratio), used for headless export and tests
//! - `tui::canvas::TerminalSurface`: rasterizes onto a ratatui buffer

use std::fmt;

use serde::Serialize;

/// Default advance per character for text measurement, logical pixels
pub const DEFAULT_CHAR_WIDTH: f64 = 7.0;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Grey with equal channels, as used for collapsed and non-matching bars
    #[must_use]
    pub const fn greyscale(value: u8, a: f64) -> Self {
        Self { r: value, g: value, b: value, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.w * factor, self.h * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { ctrl: Point, to: Point },
    Close,
}

impl PathCommand {
    fn scaled(self, factor: f64) -> Self {
        let s = |p: Point| Point::new(p.x * factor, p.y * factor);
        match self {
            PathCommand::MoveTo { to } => PathCommand::MoveTo { to: s(to) },
            PathCommand::LineTo { to } => PathCommand::LineTo { to: s(to) },
            PathCommand::QuadTo { ctrl, to } => PathCommand::QuadTo { ctrl: s(ctrl), to: s(to) },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// Closed outline to be filled
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    #[must_use]
    pub fn rect(r: Rect) -> Self {
        Self {
            commands: vec![
                PathCommand::MoveTo { to: Point::new(r.x, r.y) },
                PathCommand::LineTo { to: Point::new(r.right(), r.y) },
                PathCommand::LineTo { to: Point::new(r.right(), r.bottom()) },
                PathCommand::LineTo { to: Point::new(r.x, r.bottom()) },
                PathCommand::Close,
            ],
        }
    }

    /// Rectangle with quadratic corners. A radius of at least half the width
    /// gives a plain rectangle.
    #[must_use]
    pub fn round_rect(r: Rect, radius: f64) -> Self {
        if radius <= 0.0 || radius >= r.w / 2.0 {
            return Self::rect(r);
        }
        let radius = radius.min(r.h / 2.0);
        let (x, y, right, bottom) = (r.x, r.y, r.right(), r.bottom());
        Self {
            commands: vec![
                PathCommand::MoveTo { to: Point::new(x + radius, y) },
                PathCommand::LineTo { to: Point::new(right - radius, y) },
                PathCommand::QuadTo {
                    ctrl: Point::new(right, y),
                    to: Point::new(right, y + radius),
                },
                PathCommand::LineTo { to: Point::new(right, bottom - radius) },
                PathCommand::QuadTo {
                    ctrl: Point::new(right, bottom),
                    to: Point::new(right - radius, bottom),
                },
                PathCommand::LineTo { to: Point::new(x + radius, bottom) },
                PathCommand::QuadTo {
                    ctrl: Point::new(x, bottom),
                    to: Point::new(x, bottom - radius),
                },
                PathCommand::LineTo { to: Point::new(x, y + radius) },
                PathCommand::QuadTo { ctrl: Point::new(x, y), to: Point::new(x + radius, y) },
                PathCommand::Close,
            ],
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Smallest rectangle containing every point of the path (control points
    /// included)
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|cmd| match *cmd {
            PathCommand::MoveTo { to } | PathCommand::LineTo { to } => vec![to],
            PathCommand::QuadTo { ctrl, to } => vec![ctrl, to],
            PathCommand::Close => Vec::new(),
        });
        let first = points.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self { commands: self.commands.iter().map(|cmd| cmd.scaled(factor)).collect() }
    }
}

/// Everything the render engine needs from a drawing backend.
///
/// All coordinates are logical pixels. Backends apply their own device scale.
pub trait Surface {
    /// Logical width `W` that the coordinate transform maps onto
    fn logical_width(&self) -> f64;

    /// Start a pass: size the drawable area and clear previous content
    fn begin_frame(&mut self, logical_height: f64);

    fn fill_path(&mut self, path: &Path, color: Rgba);

    /// Draw `text` starting at `origin` (vertically centered on `origin.y`),
    /// clipped to `clip`
    fn fill_text(&mut self, text: &str, origin: Point, clip: Rect, color: Rgba);

    /// Advance width of `text` in logical pixels
    fn measure_text(&self, text: &str) -> f64;

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.fill_path(&Path::rect(rect), color);
    }
}

// ============================================================================
// DISPLAY LIST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillPath { path: Path, color: Rgba },
    FillText { text: String, origin: Point, clip: Rect, color: Rgba },
}

/// One recorded render pass, in backing pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    /// Backing width (`logical width × scale`)
    pub width: f64,
    /// Backing height (`logical height × scale`)
    pub height: f64,
    pub pixel_ratio: f64,
    pub ops: Vec<DrawOp>,
}

/// Surface that records draw calls instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    logical_width: f64,
    scale: f64,
    char_width: f64,
    list: DisplayList,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(logical_width: f64) -> Self {
        Self::with_pixel_ratio(logical_width, 1.0)
    }

    /// High-density displays back the logical area with `ratio` times as many
    /// pixels. Ratios at or below 1 are drawn unscaled.
    #[must_use]
    pub fn with_pixel_ratio(logical_width: f64, ratio: f64) -> Self {
        let scale = if ratio > 1.0 { ratio } else { 1.0 };
        Self {
            logical_width,
            scale,
            char_width: DEFAULT_CHAR_WIDTH,
            list: DisplayList {
                width: logical_width * scale,
                height: 0.0,
                pixel_ratio: scale,
                ops: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn with_char_width(mut self, char_width: f64) -> Self {
        self.char_width = char_width;
        self
    }

    #[must_use]
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    #[must_use]
    pub fn into_display_list(self) -> DisplayList {
        self.list
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.list.ops
    }
}

impl Surface for RecordingSurface {
    fn logical_width(&self) -> f64 {
        self.logical_width
    }

    fn begin_frame(&mut self, logical_height: f64) {
        self.list.width = self.logical_width * self.scale;
        self.list.height = logical_height * self.scale;
        self.list.ops.clear();
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.list.ops.push(DrawOp::FillPath { path: path.scaled(self.scale), color });
    }

    fn fill_text(&mut self, text: &str, origin: Point, clip: Rect, color: Rgba) {
        self.list.ops.push(DrawOp::FillText {
            text: text.to_string(),
            origin: Point::new(origin.x * self.scale, origin.y * self.scale),
            clip: clip.scaled(self.scale),
            color,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rect_degrades_to_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 17.5);
        assert_eq!(Path::round_rect(r, 5.0), Path::rect(r));
        assert_eq!(Path::round_rect(r, 0.0), Path::rect(r));
        let rounded = Path::round_rect(r, 3.0);
        assert_eq!(rounded.commands().len(), 10);
        assert_eq!(rounded.bounding_box(), Some(r));
    }

    #[test]
    fn test_recording_surface_scales_by_pixel_ratio() {
        let mut surface = RecordingSurface::with_pixel_ratio(100.0, 2.0);
        surface.begin_frame(36.0);
        surface.fill_rect(Rect::new(10.0, 0.0, 20.0, 17.5), Rgba::rgb(1, 2, 3));

        let list = surface.display_list();
        assert!((list.width - 200.0).abs() < f64::EPSILON);
        assert!((list.height - 72.0).abs() < f64::EPSILON);
        let DrawOp::FillPath { path, .. } = &list.ops[0] else {
            panic!("expected a path");
        };
        assert_eq!(path.bounding_box(), Some(Rect::new(20.0, 0.0, 40.0, 35.0)));
        // logical width is unaffected
        assert!((surface.logical_width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_low_ratio_is_unscaled() {
        let surface = RecordingSurface::with_pixel_ratio(100.0, 0.5);
        assert!((surface.display_list().pixel_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_begin_frame_clears_ops() {
        let mut surface = RecordingSurface::new(50.0);
        surface.begin_frame(18.0);
        surface.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::rgb(0, 0, 0));
        surface.begin_frame(18.0);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_rgba_display() {
        assert_eq!(Rgba::greyscale(200, 0.66).to_string(), "rgba(200, 200, 200, 0.66)");
    }
}
