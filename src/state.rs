use eframe::egui::Color32;

use crate::color::series_colors;
use rusty_faces::pipeline::PipelineOutput;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Merged table and report, computed once before the window opens.
    pub output: PipelineOutput,

    /// Show raw counts as bars instead of the fraction line.
    pub show_bars: bool,

    /// Colour of the distribution series.
    pub distribution_color: Color32,

    /// Colour of the cumulative series.
    pub cumulative_color: Color32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(output: PipelineOutput) -> Self {
        let colors = series_colors(2);
        Self {
            output,
            show_bars: false,
            distribution_color: colors[0],
            cumulative_color: colors[1],
            status_message: None,
        }
    }

    /// One-line load summary for the top bar.
    pub fn summary(&self) -> String {
        let per_source: Vec<String> = self
            .output
            .sources
            .iter()
            .map(|s| format!("{}: {}", s.variable, s.rows))
            .collect();
        format!(
            "{} rows read, {} kept",
            per_source.join(", "),
            self.output.table.len()
        )
    }
}
