//! Interaction state machine
//!
//! [`ViewState`] is the only mutable state behind a flame graph view, and it
//! changes only through the transitions below. Each takes the state by value
//! and returns the next one; none can fail.
//!
//! ```text
//!              ┌──────── Reset ────────┐
//!              ▼                       │
//!   ┌──────────────────┐  Zoom(f)  ┌───┴──────────────┐
//!   │ identity zoom    │──────────▶│ zoomed to f      │──┐
//!   │ range [0, 1]     │           │ range f/numTicks │  │ Zoom(g)
//!   └──────────────────┘           └──────────────────┘◀─┘
//!
//!   orthogonal: Search(text) · SetViewMode · SetSort · Hover(x, y) / Leave
//! ```
//!
//! Click is a composite: hit-test, Zoom, then Leave so the tooltip from the
//! previous zoom level doesn't linger.

#![allow(clippy::cast_precision_loss)]

use log::debug;

use crate::domain::{FrameRef, SortBy, SortDirection, ViewMode};
use crate::flamebearer::Flamebearer;
use crate::format::{format_percent, number_with_commas, DurationFormatter};
use crate::hit_test::HitTest;
use crate::render::{RenderConfig, Rect};
use crate::transform::TickTransform;

/// Tooltip offset from the pointer, logical pixels
const TOOLTIP_OFFSET_X: f64 = 15.0;
const TOOLTIP_OFFSET_Y: f64 = 12.0;

/// Tooltip box and text
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub title: String,
    pub subtitle: String,
}

/// Everything shown while the pointer rests on a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HoverOverlay {
    pub frame: FrameRef,
    pub highlight: Rect,
    pub tooltip: Tooltip,
}

/// Pointer position for a hover or click, with the surface width it was
/// measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Pointer {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }
}

/// Input events the state machine understands
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click(Pointer),
    Hover(Pointer),
    Leave,
    Reset,
    Search(String),
    SetViewMode(ViewMode),
    SetSort { sort_by: SortBy, direction: SortDirection },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    selected_level: usize,
    top_level: usize,
    range_min: f64,
    range_max: f64,
    query: String,
    sort_by: SortBy,
    sort_direction: SortDirection,
    view_mode: ViewMode,
    hover: Option<HoverOverlay>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_level: 0,
            top_level: 0,
            range_min: 0.0,
            range_max: 1.0,
            query: String::new(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            view_mode: ViewMode::default(),
            hover: None,
        }
    }
}

impl ViewState {
    // ========================================================================
    // ACCESSORS
    // ========================================================================

    #[must_use]
    pub fn selected_level(&self) -> usize {
        self.selected_level
    }

    #[must_use]
    pub fn top_level(&self) -> usize {
        self.top_level
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverOverlay> {
        self.hover.as_ref()
    }

    /// The reset control is shown whenever a non-root frame is selected
    #[must_use]
    pub fn reset_control_visible(&self) -> bool {
        self.selected_level != 0
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity_zoom(&self) -> bool {
        self.selected_level == 0
            && self.top_level == 0
            && self.range_min == 0.0
            && self.range_max == 1.0
    }

    /// Coordinate transform for this state at the given surface width
    #[must_use]
    pub fn transform(&self, flamebearer: &Flamebearer, width: f64) -> TickTransform {
        TickTransform::new(flamebearer.num_ticks(), self.range_min, self.range_max, width)
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Zoom so `frame` spans the full width. A missing or zero-width frame
    /// leaves the state as it was.
    #[must_use]
    pub fn zoom(mut self, flamebearer: &Flamebearer, frame: Option<FrameRef>) -> Self {
        let Some(target) = frame else {
            return self;
        };
        let Some(tuple) = flamebearer.frame(target) else {
            return self;
        };
        let num_ticks = flamebearer.num_ticks() as f64;
        if num_ticks <= 0.0 || tuple.width == 0 {
            return self;
        }
        self.selected_level = target.level;
        self.top_level = 0;
        self.range_min = tuple.start as f64 / num_ticks;
        self.range_max = tuple.end() as f64 / num_ticks;
        debug!(
            "Zoom to {target}: range [{:.4}, {:.4}], reset control {}",
            self.range_min,
            self.range_max,
            if self.reset_control_visible() { "visible" } else { "hidden" }
        );
        self
    }

    /// Back to identity zoom
    #[must_use]
    pub fn reset(mut self) -> Self {
        self.selected_level = 0;
        self.top_level = 0;
        self.range_min = 0.0;
        self.range_max = 1.0;
        debug!("Zoom reset");
        self
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        debug!("Search query: {:?}", self.query);
        self
    }

    /// Show highlight and tooltip for the frame under the pointer, or clear
    /// them on a miss.
    #[must_use]
    pub fn hover_at(
        mut self,
        flamebearer: &Flamebearer,
        pointer: Pointer,
        config: &RenderConfig,
    ) -> Self {
        self.hover = self.hover_overlay(flamebearer, pointer, config);
        self
    }

    #[must_use]
    pub fn leave(mut self) -> Self {
        self.hover = None;
        self
    }

    #[must_use]
    pub fn set_view_mode(mut self, mode: ViewMode) -> Self {
        debug!("View mode: {mode:?}");
        self.view_mode = mode;
        self
    }

    #[must_use]
    pub fn set_sort(mut self, sort_by: SortBy, direction: SortDirection) -> Self {
        debug!("Sort: {sort_by} {direction}");
        self.sort_by = sort_by;
        self.sort_direction = direction;
        self
    }

    /// Hit-test, zoom, then drop the hover overlay. Clicking empty space
    /// changes nothing.
    #[must_use]
    pub fn click(self, flamebearer: &Flamebearer, pointer: Pointer, config: &RenderConfig) -> Self {
        let hit = HitTest::new(flamebearer, &self, pointer.width, config).frame_at(pointer.x, pointer.y);
        if hit.is_none() {
            return self;
        }
        self.zoom(flamebearer, hit).leave()
    }

    /// New profile data: identity zoom and no hover, but search, sort and
    /// view mode carry over
    #[must_use]
    pub fn replace_profile(self) -> Self {
        self.reset().leave()
    }

    /// Dispatch one [`Event`]
    #[must_use]
    pub fn apply(self, event: Event, flamebearer: &Flamebearer, config: &RenderConfig) -> Self {
        match event {
            Event::Click(pointer) => self.click(flamebearer, pointer, config),
            Event::Hover(pointer) => self.hover_at(flamebearer, pointer, config),
            Event::Leave => self.leave(),
            Event::Reset => self.reset(),
            Event::Search(query) => self.search(query),
            Event::SetViewMode(mode) => self.set_view_mode(mode),
            Event::SetSort { sort_by, direction } => self.set_sort(sort_by, direction),
        }
    }

    fn hover_overlay(
        &self,
        flamebearer: &Flamebearer,
        pointer: Pointer,
        config: &RenderConfig,
    ) -> Option<HoverOverlay> {
        let Pointer { x, y, width } = pointer;
        if x.is_nan() || x < 0.0 || x > width || flamebearer.is_empty() {
            return None;
        }
        let hit = HitTest::new(flamebearer, self, width, config);
        let frame_ref = hit.frame_at(x, y)?;
        let frame = flamebearer.frame(frame_ref)?;
        let transform = hit.transform();

        let left = transform.tick_to_x(frame.start).max(0.0);
        let top = (frame_ref.level - self.top_level) as f64 * config.row_height;
        let highlight_width = (transform.tick_to_x(frame.end()) - left).min(width);
        let highlight = Rect::new(left, top, highlight_width, config.row_height);

        let num_ticks = flamebearer.num_ticks() as f64;
        let sample_rate = flamebearer.sample_rate();
        let df = DurationFormatter::new(num_ticks / sample_rate);
        let title = flamebearer.name_of(frame).to_string();
        let subtitle = format!(
            "{}, {} samples, {}",
            format_percent(frame.width as f64 / num_ticks),
            number_with_commas(frame.width),
            df.format(frame.width as f64 / sample_rate)
        );

        let text_chars = title.chars().count().max(subtitle.chars().count());
        let tooltip_width = text_chars as f64 * config.char_width + 2.0 * config.tooltip_padding;
        let tooltip = Tooltip {
            left: (x + TOOLTIP_OFFSET_X + tooltip_width).min(width) - tooltip_width,
            top: y + TOOLTIP_OFFSET_Y,
            width: tooltip_width,
            title,
            subtitle,
        };

        Some(HoverOverlay { frame: frame_ref, highlight, tooltip })
    }
}
