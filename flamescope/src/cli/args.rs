//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::render::RenderConfig;

#[derive(Parser, Debug)]
#[command(
    name = "flamescope",
    version,
    about = "Interactive flame graph viewer for flamebearer profiles",
    after_help = "\
EXAMPLES:
    flamescope profile.json                             Browse in the terminal
    flamescope profile.json --query net/http            Start with a search active
    flamescope profile.json --headless --export out.json --width 1200 --pixel-ratio 2"
)]
pub struct Args {
    /// Flamebearer JSON file to load
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// Initial search query (case-sensitive substring)
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Bars at or below this width (px) collapse into greyscale runs
    #[arg(long, default_value_t = 5.0)]
    pub collapse_threshold: f64,

    /// Minimum bar width (px) that gets a label
    #[arg(long, default_value_t = 20.0)]
    pub label_threshold: f64,

    /// Corner radius (px) for bars; 0 draws plain rectangles
    #[arg(long, default_value_t = 0.0)]
    pub corner_radius: f64,

    /// Logical pixels per terminal column
    #[arg(long, default_value_t = 8.0)]
    pub cell_width: f64,

    /// Write the rendered display list to FILE (JSON)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Render without the TUI (requires --export)
    #[arg(long, requires = "export")]
    pub headless: bool,

    /// Logical surface width (px) for headless rendering
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,

    /// Device pixel ratio for headless rendering
    #[arg(long, default_value_t = 1.0)]
    pub pixel_ratio: f64,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Render configuration from the threshold and geometry flags.
    ///
    /// In the terminal every character is one cell, so text is measured at
    /// `cell_width` per character there.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            collapse_threshold: self.collapse_threshold,
            label_threshold: self.label_threshold,
            corner_radius: self.corner_radius,
            char_width: if self.headless {
                RenderConfig::default().char_width
            } else {
                self.cell_width
            },
            ..RenderConfig::default()
        }
    }
}
