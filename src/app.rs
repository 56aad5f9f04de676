use eframe::egui;

use crate::state::Session;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MiningDashboardApp {
    pub state: Session,
}

impl MiningDashboardApp {
    pub fn new(state: Session) -> Self {
        Self { state }
    }
}

impl eframe::App for MiningDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: category / model selection ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: feature inputs ----
        egui::SidePanel::left("prediction_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: analysis & batch ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });

        panels::toasts(ctx, &mut self.state);
    }
}
