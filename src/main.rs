mod app;
mod color;
mod config;
mod data;
mod error;
mod model;
mod notify;
mod predict;
mod state;
mod ui;

use app::MiningDashboardApp;
use config::Settings;
use eframe::egui;
use state::Session;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Invalid settings: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };
    log::info!(
        "Models directory: {} (*.{})",
        settings.models_dir.display(),
        settings.model_extension
    );

    let mut session = Session::new(settings);
    session.init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mining ML Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(MiningDashboardApp::new(session)))),
    )
}
