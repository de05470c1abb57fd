//! Mounted flame graph view
//!
//! Owns one flamebearer and one [`ViewState`], turns front-end events into
//! transitions and decides when a render pass is due:
//!
//! ```text
//!   event ──▶ FlameGraphView ──transition──▶ ViewState' ──dirty──▶ render()
//!                   │                                                │
//!                   └── resize ──▶ Debouncer ──(100ms quiet)──▶ dirty┘
//! ```
//!
//! Until a surface width is known (mounted), pointer events and rendering are
//! no-ops.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::debounce::Debouncer;
use crate::domain::{DataError, ExportError, SortBy, SortDirection, ViewMode};
use crate::export::DisplayListExporter;
use crate::flamebearer::Flamebearer;
use crate::interaction::{Event, Pointer, ViewState};
use crate::render::{render_flamegraph, RenderConfig, RenderStats, Surface};

/// What the table collaborator receives: the same profile plus the sort
/// settings. Aggregation is the table's job.
#[derive(Debug, Clone, Copy)]
pub struct TableInput<'a> {
    pub flamebearer: &'a Flamebearer,
    pub sort_by: SortBy,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct FlameGraphView {
    flamebearer: Option<Flamebearer>,
    state: ViewState,
    config: RenderConfig,
    width: Option<f64>,
    resize: Debouncer,
    dirty: bool,
    last_stats: Option<RenderStats>,
}

impl Default for FlameGraphView {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl FlameGraphView {
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            flamebearer: None,
            state: ViewState::default(),
            config,
            width: None,
            resize: Debouncer::default(),
            dirty: false,
            last_stats: None,
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: ViewState) -> Self {
        self.state = state;
        self
    }

    // ========================================================================
    // DATA
    // ========================================================================

    /// Install new profile data. Zoom and hover reset; search, sort and view
    /// mode carry over.
    pub fn set_flamebearer(&mut self, flamebearer: Flamebearer) {
        info!(
            "Profile replaced: {} levels, {} frames, {} ticks",
            flamebearer.depth(),
            flamebearer.frame_count(),
            flamebearer.num_ticks()
        );
        self.flamebearer = Some(flamebearer);
        self.update(ViewState::replace_profile);
        self.dirty = true;
    }

    /// Parse and install a flamebearer document. Invalid data leaves the
    /// current profile in place.
    ///
    /// # Errors
    /// Returns the [`DataError`] from ingestion.
    pub fn load_json(&mut self, json: &str) -> Result<(), DataError> {
        let flamebearer = Flamebearer::from_json_str(json)?;
        self.set_flamebearer(flamebearer);
        Ok(())
    }

    #[must_use]
    pub fn flamebearer(&self) -> Option<&Flamebearer> {
        self.flamebearer.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// True when a profile is loaded but carries no samples
    #[must_use]
    pub fn shows_no_data(&self) -> bool {
        self.flamebearer.as_ref().is_some_and(Flamebearer::is_empty)
    }

    #[must_use]
    pub fn table_input(&self) -> Option<TableInput<'_>> {
        self.flamebearer.as_ref().map(|flamebearer| TableInput {
            flamebearer,
            sort_by: self.state.sort_by(),
            direction: self.state.sort_direction(),
        })
    }

    // ========================================================================
    // SURFACE LIFECYCLE
    // ========================================================================

    pub fn mount(&mut self, width: f64) {
        debug!("Mounted at width {width}");
        self.width = Some(width);
        self.dirty = true;
    }

    pub fn unmount(&mut self) {
        self.width = None;
        self.update(ViewState::leave);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.width.is_some()
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// New surface width. Hit-testing uses it at once; the render waits for
    /// the resize burst to settle.
    pub fn resize(&mut self, width: f64, now: Instant) {
        if self.width.is_none() {
            return;
        }
        self.width = Some(width);
        self.resize.trigger(now);
    }

    /// Focus gained: render on the next loop iteration
    pub fn focus(&mut self) {
        self.dirty = true;
    }

    /// Advance timers. Returns true when a render is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.resize.poll(now) {
            debug!("Resize settled, scheduling render");
            self.dirty = true;
        }
        self.needs_render()
    }

    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Time until a pending resize settles
    #[must_use]
    pub fn resize_remaining(&self, now: Instant) -> Option<Duration> {
        self.resize.remaining(now)
    }

    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty && self.is_mounted() && self.flamebearer.is_some()
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    pub fn click(&mut self, x: f64, y: f64) {
        self.pointer_event(x, y, Event::Click);
    }

    pub fn hover(&mut self, x: f64, y: f64) {
        self.pointer_event(x, y, Event::Hover);
    }

    pub fn leave(&mut self) {
        self.dispatch(Event::Leave);
    }

    pub fn reset(&mut self) {
        self.dispatch(Event::Reset);
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.dispatch(Event::Search(query.into()));
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.dispatch(Event::SetViewMode(mode));
    }

    pub fn set_sort(&mut self, sort_by: SortBy, direction: SortDirection) {
        self.dispatch(Event::SetSort { sort_by, direction });
    }

    /// Apply one event. Pointer events need both a profile and a mounted
    /// surface; the rest only need a profile to have something to redraw.
    pub fn dispatch(&mut self, event: Event) {
        let pointer_event = matches!(event, Event::Click(_) | Event::Hover(_));
        if pointer_event && !self.is_mounted() {
            return;
        }
        let Some(flamebearer) = self.flamebearer.as_ref() else {
            // Settings still stick so they apply once data arrives
            let state = std::mem::take(&mut self.state);
            self.state = match event {
                Event::Search(query) => state.search(query),
                Event::SetViewMode(mode) => state.set_view_mode(mode),
                Event::SetSort { sort_by, direction } => state.set_sort(sort_by, direction),
                _ => state,
            };
            return;
        };

        // Hover overlays sit on top of the canvas; the bars themselves only
        // change with zoom, search or layout
        let redraw = !matches!(event, Event::Hover(_) | Event::Leave | Event::SetSort { .. });
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event, flamebearer, &self.config);
        self.dirty |= redraw;
    }

    fn pointer_event(&mut self, x: f64, y: f64, event: fn(Pointer) -> Event) {
        let Some(width) = self.width else {
            return;
        };
        self.dispatch(event(Pointer::new(x, y, width)));
    }

    fn update(&mut self, transition: impl FnOnce(ViewState) -> ViewState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Draw onto `surface` if mounted and loaded. The surface's logical width
    /// becomes the view width.
    pub fn render(&mut self, surface: &mut dyn Surface) -> Option<RenderStats> {
        self.width?;
        let flamebearer = self.flamebearer.as_ref()?;
        self.width = Some(surface.logical_width());
        let stats = render_flamegraph(surface, flamebearer, &self.state, &self.config);
        self.dirty = false;
        self.last_stats = Some(stats);
        Some(stats)
    }

    #[must_use]
    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats
    }

    /// Record the current view into a display list at the mounted width
    ///
    /// # Errors
    /// Returns [`ExportError::NoProfile`] without data and
    /// [`ExportError::NotMounted`] without a surface width.
    pub fn export(&self, pixel_ratio: f64) -> Result<DisplayListExporter, ExportError> {
        let flamebearer = self.flamebearer.as_ref().ok_or(ExportError::NoProfile)?;
        let width = self.width.ok_or(ExportError::NotMounted)?;
        Ok(DisplayListExporter::render(flamebearer, &self.state, &self.config, width, pixel_ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    const PROFILE: &str = r#"{
        "names": ["total", "main", "work"],
        "levels": [[0, 100, 0, 0], [0, 100, 80, 1], [40, 20, 20, 2]],
        "numTicks": 100,
        "sampleRate": 100,
        "spyName": "gospy"
    }"#;

    fn mounted() -> FlameGraphView {
        let mut view = FlameGraphView::default();
        view.load_json(PROFILE).unwrap();
        view.mount(100.0);
        view
    }

    #[test]
    fn test_unmounted_view_ignores_pointer_and_render() {
        let mut view = FlameGraphView::default();
        view.load_json(PROFILE).unwrap();
        view.click(50.0, 40.0);
        assert!(view.state().is_identity_zoom());

        let mut surface = RecordingSurface::new(100.0);
        assert!(view.render(&mut surface).is_none());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_click_marks_dirty_and_render_clears() {
        let mut view = mounted();
        let mut surface = RecordingSurface::new(100.0);
        assert!(view.render(&mut surface).is_some());
        assert!(!view.needs_render());

        view.click(50.0, 40.0);
        assert_eq!(view.state().selected_level(), 2);
        assert!(view.needs_render());
    }

    #[test]
    fn test_hover_does_not_schedule_render() {
        let mut view = mounted();
        let mut surface = RecordingSurface::new(100.0);
        view.render(&mut surface);

        view.hover(50.0, 40.0);
        assert!(view.state().hover().is_some());
        assert!(!view.needs_render());
    }

    #[test]
    fn test_resize_renders_after_quiet_period() {
        let mut view = mounted();
        let mut surface = RecordingSurface::new(100.0);
        view.render(&mut surface);

        let start = Instant::now();
        view.resize(120.0, start);
        view.resize(140.0, start + Duration::from_millis(40));
        assert!(!view.tick(start + Duration::from_millis(100)));
        assert_eq!(
            view.resize_remaining(start + Duration::from_millis(100)),
            Some(Duration::from_millis(40))
        );
        assert!(view.tick(start + Duration::from_millis(140)));
        assert_eq!(view.width(), Some(140.0));
    }

    #[test]
    fn test_invalid_data_keeps_previous_profile() {
        let mut view = mounted();
        let err = view.load_json(r#"{"names":[],"levels":[[0,1]],"numTicks":1,"sampleRate":1}"#);
        assert!(err.is_err());
        assert_eq!(view.flamebearer().map(Flamebearer::depth), Some(3));
    }

    #[test]
    fn test_settings_before_data_are_kept() {
        let mut view = FlameGraphView::default();
        view.search("work");
        view.set_sort(SortBy::Name, SortDirection::Asc);
        view.load_json(PROFILE).unwrap();

        assert_eq!(view.state().query(), "work");
        let table = view.table_input().unwrap();
        assert_eq!(table.sort_by, SortBy::Name);
        assert_eq!(table.direction, SortDirection::Asc);
    }

    #[test]
    fn test_export_requires_profile_and_mount() {
        let mut view = FlameGraphView::default();
        assert!(matches!(view.export(1.0), Err(ExportError::NoProfile)));
        view.load_json(PROFILE).unwrap();
        assert!(matches!(view.export(1.0), Err(ExportError::NotMounted)));
        view.mount(100.0);
        assert_eq!(view.export(1.0).unwrap().stats().bars, 3);
    }

    #[test]
    fn test_empty_profile_shows_no_data() {
        let mut view = FlameGraphView::default();
        view.load_json(r#"{"names":[],"levels":[],"numTicks":0,"sampleRate":100}"#).unwrap();
        assert!(view.shows_no_data());
    }
}
