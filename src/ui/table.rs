use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::table::Table;

/// Number of pages needed for `rows` rows, at least one.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

/// Show one page of `table` with previous/next controls.
pub fn paged_table(ui: &mut Ui, table: &Table, page_size: usize, page: &mut usize) {
    let page_size = page_size.max(1);
    let pages = page_count(table.len(), page_size);
    *page = (*page).min(pages - 1);

    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(*page > 0, eframe::egui::Button::new("◀")).clicked() {
            *page -= 1;
        }
        ui.label(format!("Page {} of {pages}  ({} rows)", *page + 1, table.len()));
        if ui
            .add_enabled(*page + 1 < pages, eframe::egui::Button::new("▶"))
            .clicked()
        {
            *page += 1;
        }
    });

    let start = *page * page_size;
    let end = (start + page_size).min(table.len());

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), table.headers.len())
        .header(20.0, |mut header| {
            for name in &table.headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows[start..end] {
                body.row(18.0, |mut cells| {
                    for cell in row {
                        cells.col(|ui: &mut Ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(3, 0), 3);
    }
}
