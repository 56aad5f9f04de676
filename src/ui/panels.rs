use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::parse_hex;
use crate::model::catalog::Category;
use crate::notify::Severity;
use crate::state::Session;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Top bar – category and model selection
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut Session) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("⛏ Mining ML Predictor");
        ui.separator();

        ui.strong("Category");
        let mut category = state.category;
        for option in Category::ALL {
            ui.selectable_value(&mut category, option, option.to_string());
        }
        if category != state.category {
            let result = state.change_category(category);
            if let Err(err) = result {
                state.notifications.report(Err(err));
            }
        }

        ui.separator();
        ui.strong("Model");
        let current = state
            .selected_model
            .clone()
            .unwrap_or_else(|| "No models available".to_string());
        let models = state.models.clone();
        egui::ComboBox::from_id_salt("model_select")
            .selected_text(current.as_str())
            .width(260.0)
            .show_ui(ui, |ui: &mut Ui| {
                for name in &models {
                    let selected = state.selected_model.as_deref() == Some(name.as_str());
                    if ui.selectable_label(selected, name).clicked() && !selected {
                        if let Err(err) = state.change_model(name) {
                            state.notifications.report(Err(err));
                        }
                    }
                }
            });

        if let Some(bound) = &state.bound {
            ui.separator();
            ui.label(format!(
                "{} · {} features · unit '{}'",
                bound.label(),
                bound.arity(),
                bound.unit()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – feature inputs and single prediction
// ---------------------------------------------------------------------------

/// Render the selection & single prediction panel.
pub fn side_panel(ui: &mut Ui, state: &mut Session) {
    ui.heading("Single Prediction");
    ui.separator();

    let Some(bound) = state.bound.as_mut() else {
        ui.label("No model loaded.");
        ui.label(format!(
            "Add model files to {} and pick a category.",
            state.catalog.dir().display()
        ));
        return;
    };

    ScrollArea::vertical()
        .max_height((ui.available_height() - 160.0).max(80.0))
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("feature_table")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Feature");
                    ui.strong("Value");
                    ui.end_row();
                    for (name, value) in bound.features.values_mut() {
                        ui.label(name);
                        ui.add(egui::DragValue::new(value).speed(0.1));
                        ui.end_row();
                    }
                });
        });

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Calculate").clicked() {
            let result = state.predict();
            state.notifications.report(result);
        }
        if ui.button("Reset").clicked() {
            state.reset();
        }
    });

    if let Some(prediction) = &state.prediction {
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.label("Prediction Result:");
            ui.label(format!("{} model", state.category));
            ui.label(RichText::new(prediction.to_string()).size(28.0).strong());
        });
    }
}

// ---------------------------------------------------------------------------
// Central panel – sensitivity and batch processing
// ---------------------------------------------------------------------------

/// Render the analysis & batch processing panel.
pub fn central_panel(ui: &mut Ui, state: &mut Session) {
    let Some(bound) = &state.bound else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a model to start");
        });
        return;
    };
    let line_color = parse_hex(bound.metadata.color);
    let importances = bound.importances.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if !importances.is_empty() {
                ui.strong("Sensitivity Analysis");
                plot::importance_chart(ui, &importances, line_color);
                ui.separator();
            }

            ui.strong("Batch Upload (.csv, .parquet)");
            if ui.button("Upload Shift Data…").clicked() {
                upload_dialog(state);
            }

            let Some(batch) = &state.batch else {
                return;
            };
            ui.add_space(8.0);
            ui.heading(&state.chart_title);
            ui.label(RichText::new(format!("Batch Summary: {}", batch.summary_text)).strong());
            plot::trend_chart(ui, &batch.result, line_color);

            if ui.button("Download Results (CSV)").clicked() {
                let result = state.download(|name| {
                    rfd::FileDialog::new()
                        .set_title("Save predictions")
                        .set_file_name(name)
                        .add_filter("CSV", &["csv"])
                        .save_file()
                });
                state.notifications.report(result);
            }
            ui.add_space(8.0);

            if let Some(batch) = &state.batch {
                let page_size = state.settings.batch_page_size;
                table::paged_table(ui, &batch.output, page_size, &mut state.batch_page);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn upload_dialog(state: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Upload shift data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let result = state.batch_upload(&path);
        state.notifications.report(result);
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Error => Color32::from_rgb(198, 40, 40),
        Severity::Warning => Color32::from_rgb(237, 108, 2),
        Severity::Success => Color32::from_rgb(46, 125, 50),
        Severity::Info => Color32::from_rgb(2, 119, 189),
    }
}

/// Stack live notifications in the bottom-right corner.
pub fn toasts(ctx: &egui::Context, state: &mut Session) {
    let notices: Vec<_> = state.notifications.visible().cloned().collect();
    if notices.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .show(ctx, |ui: &mut Ui| {
            for notice in &notices {
                egui::Frame::group(ui.style())
                    .fill(severity_color(notice.severity))
                    .show(ui, |ui: &mut Ui| {
                        ui.label(RichText::new(&notice.message).color(Color32::WHITE));
                    });
                ui.add_space(4.0);
            }
        });
    ctx.request_repaint_after(std::time::Duration::from_millis(250));
}
