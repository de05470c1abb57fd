//! Headless display-list export
//!
//! Renders a profile through [`RecordingSurface`] and writes the draw calls as
//! JSON, so a flame graph can be inspected, diffed or rasterized elsewhere
//! without a terminal.
//!
//! ```json
//! {
//!   "profile": { "levels": 3, "numTicks": 100, "spyName": "gospy" },
//!   "view": { "selectedLevel": 0, "rangeMin": 0.0, "rangeMax": 1.0, "query": "" },
//!   "stats": { "bars": 3, "collapsed_runs": 0, ... },
//!   "displayList": { "width": 800.0, "height": 54.0, "pixel_ratio": 1.0, "ops": [...] }
//! }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::domain::{ExportError, SortBy, SortDirection, ViewMode};
use crate::flamebearer::Flamebearer;
use crate::interaction::ViewState;
use crate::render::{render_flamegraph, DisplayList, RecordingSurface, RenderConfig, RenderStats};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSummary {
    levels: usize,
    frames: usize,
    num_ticks: u64,
    sample_rate: f64,
    spy_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewSummary {
    selected_level: usize,
    top_level: usize,
    range_min: f64,
    range_max: f64,
    query: String,
    sort_by: SortBy,
    sort_direction: SortDirection,
    view_mode: ViewMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    profile: &'a ProfileSummary,
    view: &'a ViewSummary,
    stats: RenderStats,
    display_list: &'a DisplayList,
}

/// One recorded render pass plus the context it was rendered in
#[derive(Debug)]
pub struct DisplayListExporter {
    profile: ProfileSummary,
    view: ViewSummary,
    stats: RenderStats,
    display_list: DisplayList,
}

impl DisplayListExporter {
    /// Render `flamebearer` under `state` at `width` logical pixels.
    #[must_use]
    pub fn render(
        flamebearer: &Flamebearer,
        state: &ViewState,
        config: &RenderConfig,
        width: f64,
        pixel_ratio: f64,
    ) -> Self {
        let mut surface = RecordingSurface::with_pixel_ratio(width, pixel_ratio)
            .with_char_width(config.char_width);
        let stats = render_flamegraph(&mut surface, flamebearer, state, config);
        let (range_min, range_max) = state.range();

        Self {
            profile: ProfileSummary {
                levels: flamebearer.depth(),
                frames: flamebearer.frame_count(),
                num_ticks: flamebearer.num_ticks(),
                sample_rate: flamebearer.sample_rate(),
                spy_name: flamebearer.spy_name().to_string(),
            },
            view: ViewSummary {
                selected_level: state.selected_level(),
                top_level: state.top_level(),
                range_min,
                range_max,
                query: state.query().to_string(),
                sort_by: state.sort_by(),
                sort_direction: state.sort_direction(),
                view_mode: state.view_mode(),
            },
            stats,
            display_list: surface.into_display_list(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    #[must_use]
    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Write the export document as pretty JSON to any writer
    ///
    /// # Errors
    /// Returns [`ExportError::Json`] if serialization or the write fails.
    pub fn export<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let document = ExportDocument {
            profile: &self.profile,
            view: &self.view,
            stats: self.stats,
            display_list: &self.display_list,
        };
        serde_json::to_writer_pretty(writer, &document)?;
        Ok(())
    }

    /// Write the export document to `path`
    ///
    /// # Errors
    /// Returns [`ExportError::Io`] if the file can't be created and
    /// [`ExportError::WriteFailed`] if flushing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.export(&mut writer)?;
        writer
            .flush()
            .map_err(|e| ExportError::WriteFailed(format!("{}: {e}", path.display())))?;
        info!(
            "Exported {} draw ops ({} bars, {} labels) to {}",
            self.display_list.ops.len(),
            self.stats.bars,
            self.stats.labels,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Flamebearer {
        Flamebearer::from_json_str(
            r#"{"names":["total","main"],"levels":[[0,10,0,0],[0,10,10,1]],
                "numTicks":10,"sampleRate":100,"spyName":"rbspy"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_export_writes_camel_case_document() {
        let exporter = DisplayListExporter::render(
            &profile(),
            &ViewState::default(),
            &RenderConfig::default(),
            200.0,
            2.0,
        );
        let mut buffer = Vec::new();
        exporter.export(&mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["profile"]["spyName"], "rbspy");
        assert_eq!(value["view"]["sortBy"], "self");
        assert_eq!(value["view"]["viewMode"], "both");
        assert_eq!(value["stats"]["bars"], 2);
        assert_eq!(value["displayList"]["width"], 400.0);
        assert_eq!(value["displayList"]["ops"][0]["op"], "fill_path");
    }
}
