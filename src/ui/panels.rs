use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use rusty_faces::report::export::export_distribution;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export distribution…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.summary());
        ui.separator();

        if ui.selectable_label(state.show_bars, "Bar Chart").clicked() {
            state.show_bars = !state.show_bars;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – query results
// ---------------------------------------------------------------------------

pub fn report_panel(ui: &mut Ui, state: &AppState) {
    ui.add_space(4.0);
    for line in state.output.report.lines() {
        ui.label(RichText::new(line).strong());
    }
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export age distribution")
        .set_file_name("age_distribution.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match export_distribution(&path, &state.output.report.distribution) {
            Ok(()) => {
                log::info!("Exported age distribution to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export distribution: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
