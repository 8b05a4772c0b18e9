use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::filter::CATEGORY_COLUMN;
use crate::data::model::{CellValue, Table};
use crate::state::Session;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Upload tab
// ---------------------------------------------------------------------------

/// List the registered files and any that failed to parse.
pub fn upload_tab(ui: &mut Ui, state: &mut Session) {
    ui.heading("Upload CSV files");
    if ui.button("Browse files…").clicked() {
        super::panels::open_files_dialog(state);
    }
    ui.add_space(8.0);

    for table in state.registry.tables() {
        ui.label(format!(
            "{}  –  {} rows × {} columns",
            table.name,
            table.len(),
            table.columns.len()
        ));
    }

    for err in &state.load_errors {
        ui.label(RichText::new(err.to_string()).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Filters tab
// ---------------------------------------------------------------------------

/// Table picker plus the filtered and complete views of the active table.
pub fn filters_tab(ui: &mut Ui, state: &mut Session) {
    if state.registry.is_empty() {
        ui.label(
            RichText::new("Please upload one or more CSV files in the 'Upload Files' tab.")
                .color(Color32::from_rgb(230, 160, 40)),
        );
        return;
    }

    let names: Vec<String> = state.registry.names().map(str::to_string).collect();
    let current = state.selected.clone().unwrap_or_default();
    egui::ComboBox::from_label("Choose a table")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for name in &names {
                if ui.selectable_label(current == *name, name).clicked() && current != *name {
                    state.select_table(name);
                }
            }
        });

    ui.heading(format!("Table: {current} Analysis"));
    ui.separator();

    let complete = match state.active_table() {
        Ok(Some(t)) => t,
        _ => return,
    };
    let colors = state.category_colors.as_ref();

    ui.strong("Filtered Data");
    match &state.filtered {
        Some(filtered) => data_table(ui, "filtered", filtered, colors),
        None => {
            ui.label("Filtering failed; see the message above.");
        }
    }

    ui.add_space(12.0);
    ui.strong("Complete Table (Unfiltered)");
    data_table(ui, "complete", complete, colors);
}

/// Scrollable grid of every column and row of `table`.
fn data_table(ui: &mut Ui, id: &str, table: &Table, colors: Option<&ColorMap>) {
    ui.label(format!("{} rows", table.len()));
    let category = table.column_index(CATEGORY_COLUMN);

    egui::ScrollArea::horizontal()
        .id_salt(id)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt(id)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), table.columns.len())
                .max_scroll_height(MAX_TABLE_HEIGHT)
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for name in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let cells = &table.rows[row.index()];
                        for (col, cell) in cells.iter().enumerate() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell_text(cell, category == Some(col), colors));
                            });
                        }
                    });
                });
        });
}

fn cell_text(cell: &CellValue, is_category: bool, colors: Option<&ColorMap>) -> RichText {
    let text = RichText::new(cell.to_string());
    match colors {
        Some(cm) if is_category => text.color(cm.color_for(cell)),
        _ => text,
    }
}
