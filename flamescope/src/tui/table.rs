//! Table pane slot
//!
//! The flame graph hands the table pane the profile and the active sort
//! settings ([`TableInput`]); aggregating and ranking frames is up to the
//! pane. [`PlaceholderTable`] fills the slot until a real table is plugged
//! in.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{STYLE_DIM, STYLE_HEADING, STYLE_KEY, STYLE_LABEL, STYLE_TEXT};
use crate::format::number_with_commas;
use crate::view::TableInput;

/// Anything that can occupy the table pane
pub trait TablePane {
    fn render(&mut self, f: &mut Frame, area: Rect, input: Option<TableInput<'_>>);
}

/// Shows the sort settings and a profile summary
#[derive(Debug, Default)]
pub struct PlaceholderTable;

impl PlaceholderTable {
    #[must_use]
    pub fn lines(input: Option<TableInput<'_>>) -> Vec<Line<'static>> {
        let Some(input) = input else {
            return vec![Line::from(Span::styled("No profile loaded", STYLE_DIM))];
        };
        let fb = input.flamebearer;
        vec![
            Line::from(Span::styled("SORT", STYLE_HEADING)),
            Line::from(vec![
                Span::styled("By: ", STYLE_LABEL),
                Span::styled(input.sort_by.to_string(), STYLE_TEXT),
                Span::styled("  Direction: ", STYLE_LABEL),
                Span::styled(input.direction.to_string(), STYLE_TEXT),
            ]),
            Line::from(""),
            Line::from(Span::styled("PROFILE", STYLE_HEADING)),
            Line::from(vec![
                Span::styled("Functions: ", STYLE_LABEL),
                Span::styled(number_with_commas(fb.names().len() as u64), STYLE_TEXT),
            ]),
            Line::from(vec![
                Span::styled("Frames:    ", STYLE_LABEL),
                Span::styled(number_with_commas(fb.frame_count() as u64), STYLE_TEXT),
            ]),
            Line::from(vec![
                Span::styled("Samples:   ", STYLE_LABEL),
                Span::styled(number_with_commas(fb.num_ticks()), STYLE_TEXT),
            ]),
            Line::from(vec![
                Span::styled("Max self:  ", STYLE_LABEL),
                Span::styled(number_with_commas(fb.max_self()), STYLE_TEXT),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("s", STYLE_KEY),
                Span::styled(" sort key  ", STYLE_DIM),
                Span::styled("S", STYLE_KEY),
                Span::styled(" direction", STYLE_DIM),
            ]),
        ]
    }
}

impl TablePane for PlaceholderTable {
    fn render(&mut self, f: &mut Frame, area: Rect, input: Option<TableInput<'_>>) {
        let widget = Paragraph::new(Self::lines(input))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Table"));
        f.render_widget(widget, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortBy, SortDirection};
    use crate::flamebearer::Flamebearer;

    #[test]
    fn test_placeholder_shows_sort_settings() {
        let fb = Flamebearer::from_json_str(
            r#"{"names":["total"],"levels":[[0,1500,1500,0]],"numTicks":1500,"sampleRate":100}"#,
        )
        .unwrap();
        let input =
            TableInput { flamebearer: &fb, sort_by: SortBy::Total, direction: SortDirection::Asc };
        let text: String = PlaceholderTable::lines(Some(input))
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("total"));
        assert!(text.contains("asc"));
        assert!(text.contains("1,500"));
    }

    #[test]
    fn test_placeholder_without_profile() {
        assert_eq!(PlaceholderTable::lines(None).len(), 1);
    }
}
