//! Terminal surface: logical pixels → ratatui buffer cells
//!
//! ```text
//!   logical x:  0        8        16       24  ...   (cell_width = 8)
//!   column:     │   0    │   1    │   2    │
//!   logical y:  0 ─────── 18 ────── 36 ...          (row_height = 18)
//!   row:        │   0    │   1    │
//! ```
//!
//! Each flame graph level maps to one terminal row. Bars snap to whole cells
//! (at least one cell wide), labels are written one character per cell and
//! clipped to their bar's columns.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;

use super::theme::{blend_over, BACKGROUND, BACKGROUND_RGB};
use crate::render::{self, Path, Point, Rgba, Surface};

/// Render-engine surface backed by a region of a ratatui buffer
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    cell_width: f64,
    row_height: f64,
    logical_height: f64,
}

impl<'a> TerminalSurface<'a> {
    #[must_use]
    pub fn new(buf: &'a mut Buffer, area: Rect, cell_width: f64, row_height: f64) -> Self {
        Self { buf, area, cell_width, row_height, logical_height: 0.0 }
    }

    /// Height of the last frame in logical pixels
    #[must_use]
    pub fn logical_height(&self) -> f64 {
        self.logical_height
    }

    /// Absolute column range `[start, end)` covered by `[x0, x1)`
    fn columns(&self, x0: f64, x1: f64) -> Option<(u16, u16)> {
        if x1 <= 0.0 || self.cell_width <= 0.0 {
            return None;
        }
        let width = f64::from(self.area.width);
        let start = (x0 / self.cell_width).floor().max(0.0);
        if start >= width {
            return None;
        }
        let end = (x1 / self.cell_width).round().max(start + 1.0).min(width);
        Some((self.area.x + start as u16, self.area.x + end as u16))
    }

    /// Absolute row for a logical y coordinate
    fn row(&self, y: f64) -> Option<u16> {
        if y < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let row = (y / self.row_height).floor();
        (row < f64::from(self.area.height)).then(|| self.area.y + row as u16)
    }
}

impl Surface for TerminalSurface<'_> {
    fn logical_width(&self) -> f64 {
        f64::from(self.area.width) * self.cell_width
    }

    fn begin_frame(&mut self, logical_height: f64) {
        self.logical_height = logical_height;
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_char(' ');
                    cell.set_bg(BACKGROUND);
                }
            }
        }
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        let Some(bounds) = path.bounding_box() else {
            return;
        };
        let Some(row) = self.row(bounds.y + bounds.h / 2.0) else {
            return;
        };
        let Some((start, end)) = self.columns(bounds.x, bounds.right()) else {
            return;
        };
        let bg = blend_over(color, BACKGROUND_RGB);
        for x in start..end {
            if let Some(cell) = self.buf.cell_mut((x, row)) {
                cell.set_char(' ');
                cell.set_bg(bg);
            }
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point, clip: render::Rect, color: Rgba) {
        let Some(row) = self.row(origin.y) else {
            return;
        };
        let Some((clip_start, clip_end)) = self.columns(clip.x, clip.right()) else {
            return;
        };
        let origin_col = self.area.x + (origin.x.max(0.0) / self.cell_width).floor() as u16;
        let fg = blend_over(color, BACKGROUND_RGB);

        let mut x = origin_col.max(clip_start);
        for ch in text.chars() {
            if x >= clip_end {
                break;
            }
            if let Some(cell) = self.buf.cell_mut((x, row)) {
                cell.set_char(ch);
                cell.set_fg(fg);
            }
            x += 1;
        }
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.cell_width
    }
}

/// Logical coordinates of a terminal cell's center, if it lies in `area`
#[must_use]
pub fn cell_to_logical(
    column: u16,
    row: u16,
    area: Rect,
    cell_width: f64,
    row_height: f64,
) -> Option<(f64, f64)> {
    let inside = column >= area.left()
        && column < area.right()
        && row >= area.top()
        && row < area.bottom();
    inside.then(|| {
        (
            (f64::from(column - area.x) + 0.5) * cell_width,
            (f64::from(row - area.y) + 0.5) * row_height,
        )
    })
}

/// Emphasize the cells under a highlight rectangle
pub fn mark_highlight(
    buf: &mut Buffer,
    area: Rect,
    highlight: render::Rect,
    cell_width: f64,
    row_height: f64,
) {
    let surface = TerminalSurface::new(buf, area, cell_width, row_height);
    let Some(row) = surface.row(highlight.y + highlight.h / 2.0) else {
        return;
    };
    let Some((start, end)) = surface.columns(highlight.x, highlight.right()) else {
        return;
    };
    for x in start..end {
        if let Some(cell) = buf.cell_mut((x, row)) {
            cell.set_style(cell.style().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn buffer(width: u16, height: u16) -> Buffer {
        Buffer::empty(Rect::new(0, 0, width, height))
    }

    #[test]
    fn test_bar_snaps_to_cells() {
        let mut buf = buffer(10, 2);
        let area = Rect::new(0, 0, 10, 2);
        let mut surface = TerminalSurface::new(&mut buf, area, 8.0, 18.0);
        assert!((surface.logical_width() - 80.0).abs() < f64::EPSILON);

        surface.begin_frame(36.0);
        surface.fill_rect(render::Rect::new(16.0, 18.0, 24.0, 17.5), Rgba::rgb(255, 0, 0));

        assert_eq!(buf[(1, 1)].bg, BACKGROUND);
        assert_eq!(buf[(2, 1)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(4, 1)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(5, 1)].bg, BACKGROUND);
        assert_eq!(buf[(2, 0)].bg, BACKGROUND);
    }

    #[test]
    fn test_narrow_bar_gets_one_cell() {
        let mut buf = buffer(10, 1);
        let area = Rect::new(0, 0, 10, 1);
        let mut surface = TerminalSurface::new(&mut buf, area, 8.0, 18.0);
        surface.begin_frame(18.0);
        surface.fill_rect(render::Rect::new(8.0, 0.0, 2.0, 17.5), Rgba::rgb(0, 0, 255));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_text_clipped_to_bar() {
        let mut buf = buffer(10, 1);
        let area = Rect::new(0, 0, 10, 1);
        let mut surface = TerminalSurface::new(&mut buf, area, 8.0, 18.0);
        surface.begin_frame(18.0);
        let bar = render::Rect::new(0.0, 0.0, 32.0, 17.5);
        surface.fill_text("abcdefgh", Point::new(3.0, 8.75), bar, Rgba::rgb(0, 0, 0));

        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(3, 0)].symbol(), "d");
        assert_eq!(buf[(4, 0)].symbol(), " ");
    }

    #[test]
    fn test_rows_beyond_area_are_dropped() {
        let mut buf = buffer(4, 1);
        let area = Rect::new(0, 0, 4, 1);
        let mut surface = TerminalSurface::new(&mut buf, area, 8.0, 18.0);
        surface.begin_frame(36.0);
        surface.fill_rect(render::Rect::new(0.0, 18.0, 32.0, 17.5), Rgba::rgb(9, 9, 9));
        assert_eq!(buf[(0, 0)].bg, BACKGROUND);
    }

    #[test]
    fn test_cell_to_logical_centers() {
        let area = Rect::new(2, 1, 10, 5);
        assert_eq!(cell_to_logical(2, 1, area, 8.0, 18.0), Some((4.0, 9.0)));
        assert_eq!(cell_to_logical(5, 3, area, 8.0, 18.0), Some((28.0, 45.0)));
        assert_eq!(cell_to_logical(1, 1, area, 8.0, 18.0), None);
        assert_eq!(cell_to_logical(2, 6, area, 8.0, 18.0), None);
    }
}
