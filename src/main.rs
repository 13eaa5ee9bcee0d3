mod app;
mod color;
mod state;
mod ui;

use anyhow::anyhow;
use app::RustyFacesApp;
use eframe::egui;
use rusty_faces::pipeline::{self, Sources};
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output = pipeline::run(&Sources::default())?;
    for line in output.report.lines() {
        println!("{line}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 900.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(output);
    eframe::run_native(
        "Rusty Faces – IMDB-WIKI Ages",
        options,
        Box::new(|_cc| Ok(Box::new(RustyFacesApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
