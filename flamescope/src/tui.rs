//! # Terminal User Interface (TUI)
//!
//! Interactive flame graph in the terminal using `ratatui` + `crossterm`.
//!
//! ## Input Modes
//!
//! - **Browse** - mouse hover/click on the graph, keyboard shortcuts
//! - **Search** - text entry; the query applies as you type
//! - **Help** - keyboard shortcut overlay
//!
//! ## Sub-Modules
//!
//! - `canvas` - render-engine surface over the ratatui buffer
//! - `layout` - pane split per view mode and terminal size
//! - `table` - table pane slot and its placeholder
//! - `theme` - color scheme
//!
//! ## Event Loop
//!
//! ```text
//!   crossterm event ──▶ App::handle_* ──▶ FlameGraphView transition
//!                                                 │
//!   resize ──▶ debouncer ── 100ms quiet ──────────┤
//!   focus gained ─────────────────────────────────┤
//!                                                 ▼
//!                                 terminal.draw (one pass per change)
//! ```

// TUI rendering uses precision-losing casts between cells and logical pixels
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines
)]

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub mod canvas;
pub mod layout;
pub mod table;
mod theme;

use canvas::{cell_to_logical, mark_highlight, TerminalSurface};
use layout::compute_layout;
use table::{PlaceholderTable, TablePane};
use theme::{share_color, ACCENT_GREEN, BACKGROUND, CAUTION_AMBER, INFO_DIM};

use crate::domain::{SortBy, SortDirection, TuiError};
use crate::format::{format_percent, DurationFormatter};
use crate::interaction::HoverOverlay;
use crate::view::FlameGraphView;

/// Upper bound on how long the loop blocks waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// =============================================================================
// STYLE CONSTANTS
// =============================================================================

const STYLE_HEADING: Style = Style::new().fg(ACCENT_GREEN).add_modifier(Modifier::BOLD);
const STYLE_LABEL: Style = Style::new().fg(CAUTION_AMBER).add_modifier(Modifier::BOLD);
const STYLE_DIM: Style = Style::new().fg(INFO_DIM);
const STYLE_KEY: Style = Style::new().fg(CAUTION_AMBER);
const STYLE_TEXT: Style = Style::new().fg(Color::White);

// =============================================================================
// INPUT MODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Browse,
    Search,
    Help,
}

// =============================================================================
// APP
// =============================================================================

/// Flame graph browser. Create with [`App::new`], start with [`App::run`].
pub struct App {
    view: FlameGraphView,
    table: Box<dyn TablePane>,
    title: String,
    cell_width: f64,
    mode: InputMode,
    search_buffer: String,
    /// Interior of the graph panel at the last draw
    graph_area: Option<Rect>,
    should_quit: bool,
}

impl App {
    /// `view` should already hold the profile; `cell_width` is logical pixels
    /// per terminal column.
    #[must_use]
    pub fn new(view: FlameGraphView, title: impl Into<String>, cell_width: f64) -> Self {
        Self {
            view,
            table: Box::new(PlaceholderTable),
            title: title.into(),
            cell_width,
            mode: InputMode::Browse,
            search_buffer: String::new(),
            graph_area: None,
            should_quit: false,
        }
    }

    /// Replace the placeholder table pane
    #[must_use]
    pub fn with_table(mut self, table: Box<dyn TablePane>) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn view(&self) -> &FlameGraphView {
        &self.view
    }

    fn row_height(&self) -> f64 {
        self.view.config().row_height
    }

    fn sort(&self) -> (SortBy, SortDirection) {
        let state = self.view.state();
        (state.sort_by(), state.sort_direction())
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        match self.mode {
            InputMode::Browse => match key {
                KeyCode::Char('q' | 'Q') => self.should_quit = true,
                KeyCode::Esc => {
                    self.view.reset();
                    self.view.leave();
                }
                KeyCode::Char('/') => {
                    self.search_buffer = self.view.state().query().to_string();
                    self.mode = InputMode::Search;
                }
                KeyCode::Char('v' | 'V') => {
                    let mode = self.view.state().view_mode().next();
                    self.view.set_view_mode(mode);
                    self.view.leave();
                }
                KeyCode::Char('s') => {
                    let (sort_by, direction) = self.sort();
                    self.view.set_sort(sort_by.next(), direction);
                }
                KeyCode::Char('S') => {
                    let (sort_by, direction) = self.sort();
                    self.view.set_sort(sort_by, direction.flipped());
                }
                KeyCode::Char('?') => self.mode = InputMode::Help,
                _ => {}
            },
            InputMode::Help => {
                // Any key closes help
                self.mode = InputMode::Browse;
            }
            InputMode::Search => match key {
                KeyCode::Esc => {
                    self.search_buffer.clear();
                    self.view.search("");
                    self.mode = InputMode::Browse;
                }
                KeyCode::Enter => self.mode = InputMode::Browse,
                KeyCode::Backspace => {
                    self.search_buffer.pop();
                    self.view.search(self.search_buffer.clone());
                }
                KeyCode::Char(c) => {
                    self.search_buffer.push(c);
                    self.view.search(self.search_buffer.clone());
                }
                _ => {}
            },
        }
    }

    /// Handle mouse input. Returns true when the screen needs a redraw.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.mode != InputMode::Browse {
            return false;
        }
        let Some(area) = self.graph_area else {
            return false;
        };
        let position =
            cell_to_logical(mouse.column, mouse.row, area, self.cell_width, self.row_height());

        match (mouse.kind, position) {
            (MouseEventKind::Down(MouseButton::Left), Some((x, y))) => {
                self.view.click(x, y);
                true
            }
            (MouseEventKind::Moved, Some((x, y))) => {
                self.view.hover(x, y);
                true
            }
            (MouseEventKind::Moved, None) if self.view.state().hover().is_some() => {
                self.view.leave();
                true
            }
            _ => false,
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        let config = compute_layout(width, height, self.view.state().view_mode());
        let graph = config.split(Rect::new(0, 0, width, height)).graph.map(layout::inner);
        if let Some(graph) = graph {
            debug!("Terminal resized to {width}x{height}");
            self.view.resize(f64::from(graph.width) * self.cell_width, Instant::now());
        }
    }

    // =========================================================================
    // DRAWING
    // =========================================================================

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let config = compute_layout(area.width, area.height, self.view.state().view_mode());
        let panels = config.split(area);

        if let Some(header) = panels.header {
            self.render_header(f, header);
        }
        if let Some(table_area) = panels.table {
            self.table.render(f, table_area, self.view.table_input());
        }
        self.graph_area = panels.graph.map(layout::inner);
        if let Some(graph_area) = panels.graph {
            self.render_graph(f, graph_area);
        }
        if let Some(status) = panels.status {
            self.render_status(f, status);
        }

        match self.mode {
            InputMode::Search => render_search_overlay(f, area, &self.search_buffer),
            InputMode::Help => render_help_overlay(f, area),
            InputMode::Browse => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("FLAMESCOPE", STYLE_HEADING),
            Span::styled(" | ", STYLE_DIM),
            Span::styled(self.title.as_str(), STYLE_TEXT),
        ];
        if let Some(fb) = self.view.flamebearer() {
            let df = DurationFormatter::new(fb.num_ticks() as f64 / fb.sample_rate());
            spans.extend([
                Span::styled(" | ", STYLE_DIM),
                Span::styled(fb.spy_name().to_string(), Style::new().fg(CAUTION_AMBER)),
                Span::styled(" | ", STYLE_DIM),
                Span::styled(
                    df.format(fb.num_ticks() as f64 / fb.sample_rate()),
                    Style::new().fg(ACCENT_GREEN),
                ),
            ]);
        }
        let query = self.view.state().query();
        if !query.is_empty() {
            spans.extend([
                Span::styled(" | ", STYLE_DIM),
                Span::styled(format!("search: {query}"), STYLE_KEY),
            ]);
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default().borders(Borders::ALL).border_style(Style::new().fg(ACCENT_GREEN)),
        );
        f.render_widget(header, area);
    }

    fn render_graph(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Flame Graph")
            .style(Style::new().bg(BACKGROUND));
        f.render_widget(block, area);
        let inner = layout::inner(area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let logical_width = f64::from(inner.width) * self.cell_width;
        if !self.view.is_mounted() {
            self.view.mount(logical_width);
        }

        if self.view.shows_no_data() {
            let message = Paragraph::new(Line::from(Span::styled(
                "No profiling data available for this profile.",
                STYLE_DIM,
            )))
            .centered();
            let middle = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
                .split(inner)[1];
            f.render_widget(message, middle);
            return;
        }

        let row_height = self.row_height();
        let mut surface = TerminalSurface::new(f.buffer_mut(), inner, self.cell_width, row_height);
        let stats = self.view.render(&mut surface);
        if let Some(stats) = stats {
            debug!("Graph pass: {stats:?}");
        }

        if let Some(overlay) = self.view.state().hover().cloned() {
            mark_highlight(f.buffer_mut(), inner, overlay.highlight, self.cell_width, row_height);
            self.render_tooltip(f, inner, &overlay);
        }
    }

    /// Tooltip box at the position computed by the hover transition
    fn render_tooltip(&self, f: &mut Frame, graph: Rect, overlay: &HoverOverlay) {
        let tooltip = &overlay.tooltip;
        let width = ((tooltip.width / self.cell_width).ceil() as u16).min(graph.width);
        let height = 4u16.min(graph.height);
        let col = (tooltip.left.max(0.0) / self.cell_width).floor() as u16;
        let row = (tooltip.top.max(0.0) / self.row_height()).floor() as u16;

        let x = graph.x + col.min(graph.width.saturating_sub(width));
        let y = graph.y + row.min(graph.height.saturating_sub(height));
        let popup = Rect::new(x, y, width, height);

        let share = self
            .view
            .flamebearer()
            .and_then(|fb| {
                let frame = fb.frame(overlay.frame)?;
                Some(frame.width as f64 / fb.num_ticks() as f64 * 100.0)
            })
            .unwrap_or_default();

        let lines = vec![
            Line::from(Span::styled(tooltip.title.as_str(), STYLE_HEADING)),
            Line::from(Span::styled(tooltip.subtitle.as_str(), Style::new().fg(share_color(share)))),
        ];
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black).fg(ACCENT_GREEN)),
        );
        f.render_widget(Clear, popup);
        f.render_widget(widget, popup);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let state = self.view.state();
        let mut spans = vec![
            Span::styled("Q", STYLE_KEY),
            Span::styled(":Quit ", STYLE_DIM),
            Span::styled("/", STYLE_KEY),
            Span::styled(":Search ", STYLE_DIM),
            Span::styled("V", STYLE_KEY),
            Span::styled(":View ", STYLE_DIM),
            Span::styled("?", STYLE_KEY),
            Span::styled(":Help ", STYLE_DIM),
        ];
        if state.reset_control_visible() {
            spans.extend([Span::styled("Esc", STYLE_KEY), Span::styled(":Reset ", STYLE_DIM)]);
        }

        let mode = match self.mode {
            InputMode::Search => Span::styled("[Search]", STYLE_KEY),
            InputMode::Help => Span::styled("[Help]", STYLE_HEADING),
            InputMode::Browse if state.reset_control_visible() => {
                let (min, max) = state.range();
                Span::styled(
                    format!("[Zoom L{} {}]", state.selected_level(), format_percent(max - min)),
                    STYLE_KEY,
                )
            }
            InputMode::Browse => Span::styled("[Ready]", Style::new().fg(ACCENT_GREEN)),
        };
        spans.push(mode);

        let status = Paragraph::new(Line::from(spans)).block(
            Block::default().borders(Borders::ALL).border_style(Style::new().fg(ACCENT_GREEN)),
        );
        f.render_widget(status, area);
    }

    // =========================================================================
    // EVENT LOOP
    // =========================================================================

    /// Run the TUI event loop until quit. Returns the view as it was left.
    ///
    /// # Errors
    /// Returns an error if terminal setup or rendering fails
    pub fn run(mut self) -> Result<FlameGraphView> {
        enable_raw_mode().map_err(|e| TuiError::TerminalError(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        )?;
        terminal.show_cursor()?;

        result.map(|()| self.view)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut redraw = true;
        loop {
            if self.view.tick(Instant::now()) {
                redraw = true;
            }
            if redraw && !self.view.resize_pending() {
                terminal.draw(|f| self.draw(f)).context("Failed to draw frame")?;
                redraw = false;
            }

            let timeout = self
                .view
                .resize_remaining(Instant::now())
                .map_or(POLL_INTERVAL, |remaining| remaining.min(POLL_INTERVAL));
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code);
                        redraw = true;
                    }
                    Event::Mouse(mouse) => redraw |= self.handle_mouse(mouse),
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    Event::FocusGained => {
                        self.view.focus();
                        redraw = true;
                    }
                    _ => {}
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// OVERLAY RENDERERS
// =============================================================================

/// Centered popup: `width_percent` of the width, `height_lines` tall
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height_lines), Constraint::Fill(1)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_search_overlay(f: &mut Frame, area: Rect, query: &str) {
    let popup_area = centered_popup(area, 60, 3);
    let widget = Paragraph::new(format!("Search: {query}_"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Highlight Frames")
                .style(Style::default().bg(Color::Black).fg(ACCENT_GREEN)),
        )
        .style(Style::default().fg(CAUTION_AMBER));

    f.render_widget(Clear, popup_area);
    f.render_widget(widget, popup_area);
}

/// Render the help overlay explaining the graph and keyboard shortcuts
fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 70, 20);

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  Reading The Graph", STYLE_HEADING)),
        Line::from(Span::styled("  Each row is one stack depth, the root on top.", STYLE_DIM)),
        Line::from(Span::styled("  Bar width is the share of samples in that call.", STYLE_DIM)),
        Line::from(Span::styled("  Grey runs are frames too narrow to show alone.", STYLE_DIM)),
        Line::from(""),
        Line::from(Span::styled("  Mouse", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  Hover  ", STYLE_LABEL),
            Span::styled("Show name, share, samples and duration", STYLE_DIM),
        ]),
        Line::from(vec![
            Span::styled("  Click  ", STYLE_LABEL),
            Span::styled("Zoom into the frame", STYLE_DIM),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Keys", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  /", STYLE_KEY),
            Span::styled(" Search   ", STYLE_TEXT),
            Span::styled("Esc", STYLE_KEY),
            Span::styled(" Reset zoom   ", STYLE_TEXT),
            Span::styled("V", STYLE_KEY),
            Span::styled(" View mode", STYLE_TEXT),
        ]),
        Line::from(vec![
            Span::styled("  s", STYLE_KEY),
            Span::styled(" Sort key   ", STYLE_TEXT),
            Span::styled("S", STYLE_KEY),
            Span::styled(" Sort direction   ", STYLE_TEXT),
            Span::styled("Q", STYLE_KEY),
            Span::styled(" Quit", STYLE_TEXT),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", STYLE_DIM)),
    ];

    let widget = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(Style::default().bg(Color::Black).fg(ACCENT_GREEN)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(widget, popup_area);
}
