use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::fill;
use crate::state::AppState;

const AGE_AXIS: &str = "Age in Years";

const DISTRIBUTION_TITLE: &str =
    "Distribution of Observations at Each Age from 1 to 100 in IMDB-WIKI Dataset";
const DISTRIBUTION_AXIS: &str = "Fraction of Observations";
const COUNT_AXIS: &str = "Number of Observations";

const CUMULATIVE_TITLE: &str =
    "Cumulative Distribution of Observations for Each Age in IMDB-WIKI Dataset";
const CUMULATIVE_AXIS: &str = "Cumulative Distribution of Observations";

// ---------------------------------------------------------------------------
// Age distribution (upper plot)
// ---------------------------------------------------------------------------

/// Fraction of observations per age, or raw counts as bars when toggled.
pub fn distribution_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let dist = &state.output.report.distribution;
    let color = state.distribution_color;

    ui.heading(DISTRIBUTION_TITLE);
    let y_label = if state.show_bars {
        COUNT_AXIS
    } else {
        DISTRIBUTION_AXIS
    };

    Plot::new("distribution_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(AGE_AXIS)
        .y_axis_label(y_label)
        .show_grid(true)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            if state.show_bars {
                let bars: Vec<Bar> = dist
                    .counts()
                    .map(|(age, count)| {
                        Bar::new(age as f64, count as f64)
                            .width(1.0)
                            .fill(fill(color))
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name("observations")
                        .color(color),
                );
            } else {
                let points: PlotPoints = dist
                    .fractions()
                    .map(|(age, fraction)| [age as f64, fraction])
                    .collect();
                plot_ui.line(Line::new(points).name("fraction").color(color).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Cumulative distribution (lower plot)
// ---------------------------------------------------------------------------

pub fn cumulative_plot(ui: &mut Ui, state: &AppState, height: f32) {
    ui.heading(CUMULATIVE_TITLE);

    let points: PlotPoints = state
        .output
        .report
        .cumulative
        .iter()
        .map(|&(age, cumulative)| [age as f64, cumulative])
        .collect();

    Plot::new("cumulative_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(AGE_AXIS)
        .y_axis_label(CUMULATIVE_AXIS)
        .show_grid(true)
        .include_y(0.0)
        .include_y(1.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("cumulative")
                    .color(state.cumulative_color)
                    .width(1.5),
            );
        });
}
