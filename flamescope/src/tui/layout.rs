//! Responsive layout engine for the TUI.
//!
//! Splits the main area between the table pane and the flame graph according
//! to the view mode, and adapts to narrow or short terminals.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::domain::ViewMode;

// Width breakpoint: below this, "both" stacks the table above the graph
const WIDTH_SIDE_BY_SIDE: u16 = 100;

// Height breakpoint: below this, header and status bar are dropped
const HEIGHT_MINIMAL: u16 = 12;

/// Computed layout configuration based on terminal dimensions and view mode.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LayoutConfig {
    pub show_table: bool,
    pub show_graph: bool,
    /// Header and status bar
    pub show_chrome: bool,
    /// Table above the graph instead of beside it
    pub stacked: bool,
    /// Table share of the split (0-100)
    pub table_pct: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { show_table: true, show_graph: true, show_chrome: true, stacked: false, table_pct: 35 }
    }
}

/// Panel rectangles for one draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panels {
    pub header: Option<Rect>,
    pub table: Option<Rect>,
    pub graph: Option<Rect>,
    pub status: Option<Rect>,
}

/// Compute layout configuration.
///
/// | Condition            | Behavior                                  |
/// |----------------------|-------------------------------------------|
/// | `graph` / `table`    | that pane only, full width                |
/// | `both`, width ≥ 100  | table 35% left, graph 65% right           |
/// | `both`, width < 100  | table 30% on top, graph below             |
/// | Height < 12          | no header or status bar                   |
#[must_use]
pub fn compute_layout(width: u16, height: u16, mode: ViewMode) -> LayoutConfig {
    let mut config = LayoutConfig {
        show_table: mode.shows_table(),
        show_graph: mode.shows_graph(),
        ..LayoutConfig::default()
    };

    if mode == ViewMode::Both && width < WIDTH_SIDE_BY_SIDE {
        config.stacked = true;
        config.table_pct = 30;
    }

    if height < HEIGHT_MINIMAL {
        config.show_chrome = false;
    }

    config
}

impl LayoutConfig {
    /// Split `area` into panels
    #[must_use]
    pub fn split(&self, area: Rect) -> Panels {
        let mut panels = Panels::default();

        let main = if self.show_chrome {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
                .split(area);
            panels.header = Some(rows[0]);
            panels.status = Some(rows[2]);
            rows[1]
        } else {
            area
        };

        match (self.show_table, self.show_graph) {
            (true, true) => {
                let direction =
                    if self.stacked { Direction::Vertical } else { Direction::Horizontal };
                let parts = Layout::default()
                    .direction(direction)
                    .constraints([
                        Constraint::Percentage(self.table_pct),
                        Constraint::Percentage(100 - self.table_pct),
                    ])
                    .split(main);
                panels.table = Some(parts[0]);
                panels.graph = Some(parts[1]);
            }
            (true, false) => panels.table = Some(main),
            (false, _) => panels.graph = Some(main),
        }

        panels
    }
}

/// Drawable interior of a bordered panel
#[must_use]
pub fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_side_by_side() {
        let config = compute_layout(120, 40, ViewMode::Both);
        assert!(config.show_table && config.show_graph);
        assert!(!config.stacked);
        let panels = config.split(Rect::new(0, 0, 120, 40));
        let (table, graph) = (panels.table.unwrap(), panels.graph.unwrap());
        assert_eq!(table.y, graph.y);
        assert!(graph.width > table.width);
    }

    #[test]
    fn test_both_stacks_when_narrow() {
        let config = compute_layout(80, 40, ViewMode::Both);
        assert!(config.stacked);
        let panels = config.split(Rect::new(0, 0, 80, 40));
        assert!(panels.graph.unwrap().y > panels.table.unwrap().y);
    }

    #[test]
    fn test_single_pane_modes() {
        let graph = compute_layout(120, 40, ViewMode::Graph).split(Rect::new(0, 0, 120, 40));
        assert!(graph.table.is_none());
        assert_eq!(graph.graph.unwrap().width, 120);

        let table = compute_layout(120, 40, ViewMode::Table).split(Rect::new(0, 0, 120, 40));
        assert!(table.graph.is_none());
        assert!(table.table.is_some());
    }

    #[test]
    fn test_minimal_height_drops_chrome() {
        let config = compute_layout(120, 10, ViewMode::Graph);
        assert!(!config.show_chrome);
        let panels = config.split(Rect::new(0, 0, 120, 10));
        assert!(panels.header.is_none() && panels.status.is_none());
        assert_eq!(panels.graph.unwrap().height, 10);
    }

    #[test]
    fn test_inner_shrinks_by_border() {
        assert_eq!(inner(Rect::new(0, 0, 10, 5)), Rect::new(1, 1, 8, 3));
        assert_eq!(inner(Rect::new(0, 0, 1, 1)), Rect::new(1, 1, 0, 0));
    }
}
