//! Render engine: flamebearer + view state → draw calls
//!
//! ```text
//!   row 0  ┌──────────────────────── total (100%, 1.00 second) ─────────────┐
//!   row 1  ┌──────── main (60%, …) ────────┐┌──── worker (40%, …) ──────────┐
//!   row 2  ┌─ parse ─┐┌ a ┐▒▒▒▒▒            ┌── io ──┐
//!                          └── collapsed run (greyscale, unlabelled)
//! ```
//!
//! Rows start at `top_level`. Each frame becomes one bar, except that runs of
//! adjacent frames narrower than the collapse threshold with the same search
//! status merge into a single greyscale bar. Nothing here mutates view state.

#![allow(clippy::cast_precision_loss)]

pub mod color;
pub mod package;
pub mod surface;

use log::debug;
use serde::Serialize;

use crate::flamebearer::{Flamebearer, Frame};
use crate::format::{format_percent, DurationFormatter};
use crate::interaction::ViewState;

use color::{color_for_package, ANCESTOR_ALPHA, GREYSCALE, HIGHLIGHT, LABEL_TEXT};
use package::package_name;
pub use surface::{DisplayList, DrawOp, Path, Point, RecordingSurface, Rect, Rgba, Surface};

/// Layout constants for one render pass, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Height of one level
    pub row_height: f64,
    /// Bars at or below this width collapse into greyscale runs and are not
    /// hit-testable
    pub collapse_threshold: f64,
    /// Minimum bar width that gets a label
    pub label_threshold: f64,
    /// Spacing subtracted from bar width (non-collapsed) and height
    pub gap: f64,
    /// Corner radius for bar paths; 0 draws plain rectangles
    pub corner_radius: f64,
    /// Horizontal label offset from the bar's visible left edge
    pub label_inset: f64,
    /// Advance per character when sizing the tooltip
    pub char_width: f64,
    /// Horizontal padding added to each side of the tooltip text
    pub tooltip_padding: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            row_height: 18.0,
            collapse_threshold: 5.0,
            label_threshold: 20.0,
            gap: 0.5,
            corner_radius: 0.0,
            label_inset: 3.0,
            char_width: surface::DEFAULT_CHAR_WIDTH,
            tooltip_padding: 8.0,
        }
    }
}

/// Counters from one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Bars filled, collapsed runs included
    pub bars: usize,
    pub collapsed_runs: usize,
    pub labels: usize,
    /// Labels whose measured text overflows their bar
    pub clipped_labels: usize,
    /// Runs skipped because they lie entirely outside `[0, W]`
    pub culled: usize,
}

/// Case-sensitive substring match of a frame label against an active query.
/// An empty query matches nothing.
#[must_use]
pub fn node_is_in_query(flamebearer: &Flamebearer, frame: &Frame, query: &str) -> bool {
    !query.is_empty() && flamebearer.name_of(frame).contains(query)
}

/// Height in logical pixels needed to show every level from `top_level` down
#[must_use]
pub fn canvas_height(flamebearer: &Flamebearer, top_level: usize, config: &RenderConfig) -> f64 {
    flamebearer.depth().saturating_sub(top_level) as f64 * config.row_height
}

/// Draw the flame graph for `state` onto `surface`.
///
/// The surface is resized first, so a pass always starts from a blank
/// canvas. Empty profiles draw nothing.
pub fn render_flamegraph(
    surface: &mut dyn Surface,
    flamebearer: &Flamebearer,
    state: &ViewState,
    config: &RenderConfig,
) -> RenderStats {
    let top_level = state.top_level();
    surface.begin_frame(canvas_height(flamebearer, top_level, config));

    let mut stats = RenderStats::default();
    if flamebearer.is_empty() {
        return stats;
    }

    let width = surface.logical_width();
    let transform = state.transform(flamebearer, width);
    let df = DurationFormatter::new(flamebearer.num_ticks() as f64 / flamebearer.sample_rate());
    let query = state.query();
    let query_active = !query.is_empty();
    let bar_height = config.row_height - config.gap;

    for (row, frames) in flamebearer.levels().iter().enumerate().skip(top_level) {
        let y = (row - top_level) as f64 * config.row_height;
        let alpha = if row < state.selected_level() { ANCESTOR_ALPHA } else { 1.0 };

        let mut j = 0;
        while j < frames.len() {
            let first = &frames[j];
            let in_query = node_is_in_query(flamebearer, first, query);
            let mut run_ticks = first.width;
            let mut run_end = first.end();
            let collapsed = transform.ticks_to_width(run_ticks) <= config.collapse_threshold;

            if collapsed {
                // Each candidate is judged by its own width, so a run may
                // grow past the threshold
                while let Some(next) = frames.get(j + 1) {
                    if next.start != run_end
                        || transform.ticks_to_width(next.width) > config.collapse_threshold
                        || node_is_in_query(flamebearer, next, query) != in_query
                    {
                        break;
                    }
                    run_ticks += next.width;
                    run_end = next.end();
                    j += 1;
                }
            }
            j += 1;

            let x = transform.tick_to_x(first.start);
            let run_width = transform.ticks_to_width(run_ticks);
            if run_width <= 0.0 || x + run_width < 0.0 || x > width {
                stats.culled += 1;
                continue;
            }

            let bar_width = run_width - if collapsed { 0.0 } else { config.gap };
            let bar = Rect::new(x, y, bar_width, bar_height);

            let fill = if collapsed || (query_active && !in_query) {
                GREYSCALE
            } else if query_active {
                HIGHLIGHT
            } else {
                let label = flamebearer.name_of(first);
                color_for_package(package_name(flamebearer.spy_name(), label), alpha)
            };
            surface.fill_path(&Path::round_rect(bar, config.corner_radius), fill);
            stats.bars += 1;
            if collapsed {
                stats.collapsed_runs += 1;
                continue;
            }

            if bar_width >= config.label_threshold {
                let ratio = run_ticks as f64 / flamebearer.num_ticks() as f64;
                let text = format!(
                    "{} ({}, {})",
                    flamebearer.name_of(first),
                    format_percent(ratio),
                    df.format(run_ticks as f64 / flamebearer.sample_rate())
                );
                let origin = Point::new((x.max(0.0) + config.label_inset).round(), y + bar_height / 2.0);
                if origin.x + surface.measure_text(&text) > bar.right() {
                    stats.clipped_labels += 1;
                }
                surface.fill_text(&text, origin, bar, LABEL_TEXT);
                stats.labels += 1;
            }
        }
    }

    debug!(
        "Rendered {} bars ({} collapsed, {} labels, {} culled) at width {width}",
        stats.bars, stats.collapsed_runs, stats.labels, stats.culled
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpyName;

    fn profile(levels: Vec<Vec<Frame>>, names: &[&str], num_ticks: u64) -> Flamebearer {
        Flamebearer::from_parts(
            names.iter().map(|s| (*s).to_string()).collect(),
            levels,
            num_ticks,
            100.0,
            SpyName::GoSpy,
        )
        .unwrap()
    }

    fn fills(surface: &RecordingSurface) -> Vec<(Rect, Rgba)> {
        surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPath { path, color } => Some((path.bounding_box()?, *color)),
                DrawOp::FillText { .. } => None,
            })
            .collect()
    }

    fn texts(surface: &RecordingSurface) -> Vec<String> {
        surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.clone()),
                DrawOp::FillPath { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_root_fills_width_with_label() {
        let fb = profile(vec![vec![Frame::new(0, 100, 100, 0)]], &["total"], 100);
        let mut surface = RecordingSurface::new(400.0);
        let stats =
            render_flamegraph(&mut surface, &fb, &ViewState::default(), &RenderConfig::default());

        assert_eq!(stats.bars, 1);
        assert_eq!(stats.labels, 1);
        let bars = fills(&surface);
        assert_eq!(bars[0].0, Rect::new(0.0, 0.0, 399.5, 17.5));
        assert_eq!(texts(&surface), vec!["total (100%, 1.00 second)".to_string()]);
        assert!((surface.display_list().height - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_adjacent_narrow_frames_merge() {
        // 2px each at W=100, numTicks=100
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 2, 2, 1), Frame::new(2, 2, 2, 2), Frame::new(4, 96, 96, 1)],
            ],
            &["total", "a", "b"],
            100,
        );
        let mut surface = RecordingSurface::new(100.0);
        let stats =
            render_flamegraph(&mut surface, &fb, &ViewState::default(), &RenderConfig::default());

        assert_eq!(stats.bars, 3);
        assert_eq!(stats.collapsed_runs, 1);
        let bars = fills(&surface);
        assert_eq!(bars[1], (Rect::new(0.0, 18.0, 4.0, 17.5), GREYSCALE));
    }

    #[test]
    fn test_collapsed_run_grows_past_threshold() {
        // four 2px frames are each collapsible; together they span 8px
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![
                    Frame::new(0, 2, 2, 1),
                    Frame::new(2, 2, 2, 1),
                    Frame::new(4, 2, 2, 1),
                    Frame::new(6, 2, 2, 1),
                    Frame::new(8, 92, 92, 1),
                ],
            ],
            &["total", "a"],
            100,
        );
        let config = RenderConfig::default();
        let mut surface = RecordingSurface::new(100.0);
        let stats = render_flamegraph(&mut surface, &fb, &ViewState::default(), &config);

        assert_eq!(stats.collapsed_runs, 1);
        assert_eq!(stats.bars, 3);
        let bars = fills(&surface);
        assert_eq!(bars[1], (Rect::new(0.0, 18.0, 8.0, 17.5), GREYSCALE));
        assert!(bars[1].0.w > config.collapse_threshold);
        // the wide remainder keeps its own bar
        assert_eq!(bars[2].0, Rect::new(8.0, 18.0, 91.5, 17.5));
    }

    #[test]
    fn test_query_match_is_case_sensitive() {
        let fb = profile(vec![vec![Frame::new(0, 10, 10, 0)]], &["net/http.serve"], 10);
        let frame = &fb.levels()[0][0];

        assert!(node_is_in_query(&fb, frame, "http"));
        assert!(!node_is_in_query(&fb, frame, "HTTP"));
        assert!(!node_is_in_query(&fb, frame, "Http"));
        assert!(!node_is_in_query(&fb, frame, ""));
    }

    #[test]
    fn test_clearing_query_restores_package_colors() {
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 50, 50, 1), Frame::new(50, 50, 50, 2)],
            ],
            &["total", "net/http.serve", "runtime.gc"],
            100,
        );
        let config = RenderConfig::default();
        let mut plain = RecordingSurface::new(1000.0);
        render_flamegraph(&mut plain, &fb, &ViewState::default(), &config);
        let mut cleared = RecordingSurface::new(1000.0);
        let state = ViewState::default().search("http").search("");
        render_flamegraph(&mut cleared, &fb, &state, &config);

        assert_eq!(fills(&cleared), fills(&plain));
        assert!(!fills(&cleared).iter().any(|(_, c)| *c == HIGHLIGHT || *c == GREYSCALE));
    }

    #[test]
    fn test_differing_match_status_does_not_merge() {
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 2, 2, 1), Frame::new(2, 2, 2, 2), Frame::new(4, 96, 96, 1)],
            ],
            &["total", "alpha", "beta"],
            100,
        );
        let state = ViewState::default().search("beta");
        let mut surface = RecordingSurface::new(100.0);
        let stats = render_flamegraph(&mut surface, &fb, &state, &RenderConfig::default());

        assert_eq!(stats.collapsed_runs, 2);
        assert_eq!(stats.bars, 4);
    }

    #[test]
    fn test_search_colors() {
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 50, 50, 1), Frame::new(50, 50, 50, 2)],
            ],
            &["total", "net/http.serve", "runtime.gc"],
            100,
        );
        let state = ViewState::default().search("http");
        let mut surface = RecordingSurface::new(1000.0);
        render_flamegraph(&mut surface, &fb, &state, &RenderConfig::default());

        let colors: Vec<Rgba> = fills(&surface).into_iter().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![GREYSCALE, HIGHLIGHT, GREYSCALE]);
    }

    #[test]
    fn test_ancestors_of_selection_are_faded() {
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 100, 50, 1)],
                vec![Frame::new(40, 20, 20, 2)],
            ],
            &["total", "main", "work"],
            100,
        );
        let state = ViewState::default().zoom(&fb, Some(crate::domain::FrameRef::new(2, 0)));
        let mut surface = RecordingSurface::new(100.0);
        render_flamegraph(&mut surface, &fb, &state, &RenderConfig::default());

        let alphas: Vec<f64> = fills(&surface).into_iter().map(|(_, c)| c.a).collect();
        assert_eq!(alphas, vec![ANCESTOR_ALPHA, ANCESTOR_ALPHA, 1.0]);
    }

    #[test]
    fn test_offscreen_runs_are_culled() {
        let fb = profile(
            vec![
                vec![Frame::new(0, 100, 0, 0)],
                vec![Frame::new(0, 30, 30, 1), Frame::new(40, 20, 20, 2), Frame::new(70, 30, 30, 1)],
            ],
            &["total", "a", "b"],
            100,
        );
        let state = ViewState::default().zoom(&fb, Some(crate::domain::FrameRef::new(1, 1)));
        let mut surface = RecordingSurface::new(200.0);
        let stats = render_flamegraph(&mut surface, &fb, &state, &RenderConfig::default());

        assert_eq!(stats.culled, 2);
        assert_eq!(stats.bars, 2);
    }

    #[test]
    fn test_empty_profile_draws_nothing() {
        let fb = profile(Vec::new(), &[], 0);
        let mut surface = RecordingSurface::new(100.0);
        let stats =
            render_flamegraph(&mut surface, &fb, &ViewState::default(), &RenderConfig::default());
        assert_eq!(stats, RenderStats::default());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_rounded_corners_when_configured() {
        let fb = profile(vec![vec![Frame::new(0, 100, 100, 0)]], &["total"], 100);
        let config = RenderConfig { corner_radius: 3.0, ..RenderConfig::default() };
        let mut surface = RecordingSurface::new(100.0);
        render_flamegraph(&mut surface, &fb, &ViewState::default(), &config);

        let DrawOp::FillPath { path, .. } = &surface.ops()[0] else {
            panic!("expected a path");
        };
        assert!(path
            .commands()
            .iter()
            .any(|cmd| matches!(cmd, surface::PathCommand::QuadTo { .. })));
    }
}
