use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::shades;
use crate::model::binder::ImportanceRow;
use crate::predict::BatchResult;

// ---------------------------------------------------------------------------
// Sensitivity analysis (feature importance bars)
// ---------------------------------------------------------------------------

/// Bar chart of feature importances, most important on the left.
pub fn importance_chart(ui: &mut Ui, rows: &[ImportanceRow], base: Color32) {
    let colors = shades(base, rows.len());
    let bars: Vec<Bar> = rows
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (row, color))| {
            Bar::new(i as f64, row.importance)
                .name(&row.feature)
                .fill(color)
                .width(0.7)
        })
        .collect();

    let names: Vec<String> = rows.iter().map(|r| r.feature.clone()).collect();

    Plot::new("importance_plot")
        .height(220.0)
        .y_axis_label("Importance")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            names.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Feature Weight Comparison"));
        });
}

// ---------------------------------------------------------------------------
// Batch trend line
// ---------------------------------------------------------------------------

/// Line of predictions against the 1-based row index.
pub fn trend_chart(ui: &mut Ui, batch: &BatchResult, color: Color32) {
    let points: PlotPoints = batch.points().into_iter().collect();

    Plot::new("trend_plot")
        .height(260.0)
        .x_axis_label("Index")
        .y_axis_label("Prediction")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Prediction").color(color).width(2.0));
        });
}
