//! # Flamescope - Interactive Flame Graph Engine
//!
//! Flamescope renders flamebearer profiles (a compact, level-indexed encoding
//! of a call tree) as interactive flame graphs: zoom into a frame by clicking
//! it, hover for a tooltip, search to highlight matching frames.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                  profile.json (flamebearer)                   │
//! └───────────────────────────┬───────────────────────────────────┘
//!                             │ parse + validate
//!                             ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Flamebearer ──▶ TickTransform ──▶ render_flamegraph ──▶ Surface│
//! │       │               ▲                                 │     │
//! │       │               │ range, selected level           │     │
//! │       ▼               │                                 ▼     │
//! │   HitTest ◀──── ViewState ◀── Event (click, hover...)   │     │
//! └─────────────────────────────────────────────────────────┼─────┘
//!                                                           │
//!                     ┌─────────────────────┬───────────────┘
//!                     ▼                     ▼
//!             TerminalSurface        RecordingSurface
//!               (ratatui TUI)       (display-list export)
//! ```
//!
//! ## Module Structure
//!
//! - [`flamebearer`]: wire format, validation, frame accessors
//! - [`transform`]: tick ↔ pixel mapping under the current zoom
//! - [`render`]: collapsing, coloring, labeling, the [`render::Surface`] seam
//! - [`hit_test`]: pointer position → frame, binary search per level
//! - [`interaction`]: the [`interaction::ViewState`] state machine
//! - [`view`]: mounted view, dirty tracking, resize debouncing
//! - [`export`]: headless display-list JSON
//! - [`tui`]: terminal front-end
//! - [`cli`]: command-line arguments
//!
//! ## Typical Usage
//!
//! ```bash
//! # Browse a profile in the terminal
//! flamescope profile.json
//!
//! # Render at 1200px, 2x pixel ratio, without a terminal
//! flamescope profile.json --headless --export graph.json --pixel-ratio 2
//! ```

pub mod cli;
pub mod debounce;
pub mod domain;
pub mod export;
pub mod flamebearer;
pub mod format;
pub mod interaction;
pub mod render;
pub mod transform;
pub mod tui;
pub mod view;
