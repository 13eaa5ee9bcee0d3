use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyFacesApp {
    pub state: AppState,
}

impl RustyFacesApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyFacesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: query results ----
        egui::TopBottomPanel::bottom("report_panel").show(ctx, |ui| {
            panels::report_panel(ui, &self.state);
        });

        // ---- Central panel: both plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let plot_height = (ui.available_height() / 2.0 - 30.0).max(120.0);
            plot::distribution_plot(ui, &self.state, plot_height);
            ui.separator();
            plot::cumulative_plot(ui, &self.state, plot_height);
        });
    }
}
