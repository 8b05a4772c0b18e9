use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{
    CATEGORY_COLUMN, C0_MISSING_COLUMN, MISSING_THRESHOLD0_STEP, MISS_THRESHOLD_STEP,
    P_THRESHOLD_STEP, THRESHOLD_RANGE,
};
use crate::data::loader::read_upload;
use crate::error::DashboardError;
use crate::state::Session;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut Session) {
    ui.heading("Filters");
    ui.separator();

    let table = match state.active_table() {
        Ok(Some(t)) => t,
        _ => {
            ui.label("No table selected.");
            return;
        }
    };
    let has_c0_missing = table.column_index(C0_MISSING_COLUMN).is_some();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if has_c0_missing {
                let mut value = state.params.missing_threshold0;
                let label = format!("{C0_MISSING_COLUMN} <= threshold");
                if threshold_input(ui, &label, &mut value, MISSING_THRESHOLD0_STEP) {
                    state.set_missing_threshold0(value);
                }
            }

            let mut value = state.params.p_threshold;
            if threshold_input(ui, "Select Threshold for p value", &mut value, P_THRESHOLD_STEP) {
                state.set_p_threshold(value);
            }

            let mut value = state.params.miss_threshold;
            if threshold_input(ui, "Maximum missing data", &mut value, MISS_THRESHOLD_STEP) {
                state.set_miss_threshold(value);
            }

            ui.separator();
            category_filter(ui, state);
        });
}

/// A labelled slider over the threshold range. Returns true when the user moved it.
fn threshold_input(ui: &mut Ui, label: &str, value: &mut f64, step: f64) -> bool {
    ui.strong(label);
    let changed = ui
        .add(
            egui::Slider::new(value, THRESHOLD_RANGE)
                .step_by(step)
                .fixed_decimals(2),
        )
        .changed();
    ui.add_space(6.0);
    changed
}

/// Checkbox list over the distinct `Category` values of the active table.
fn category_filter(ui: &mut Ui, state: &mut Session) {
    let Some(all_values) = state.all_categories() else {
        return;
    };

    let n_selected = all_values
        .iter()
        .filter(|v| state.is_category_selected(v))
        .count();
    let header_text = format!("Filter by {CATEGORY_COLUMN}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(CATEGORY_COLUMN)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_categories();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_categories();
                }
            });

            for val in &all_values {
                let mut text = RichText::new(val.to_string());
                if let Some(cm) = &state.category_colors {
                    text = text.color(cm.color_for(val));
                }
                let mut checked = state.is_category_selected(val);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut Session) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV files…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.registry.is_empty() {
            ui.label(format!("{} tables loaded", state.registry.len()));
            if let Some(filtered) = &state.filtered {
                ui.separator();
                ui.label(format!("{} rows pass filters", filtered.len()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick one or more files and load them as a new upload batch.
pub fn open_files_dialog(state: &mut Session) {
    let Some(paths) = rfd::FileDialog::new()
        .set_title("Upload CSV files")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON records", &["json"])
        .pick_files()
    else {
        return;
    };

    let mut uploads = Vec::with_capacity(paths.len());
    let mut read_errors = Vec::new();
    for path in &paths {
        match read_upload(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                read_errors.push(DashboardError::Parse {
                    file: path.display().to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    state.upload(uploads);
    if let Some(first) = read_errors.first() {
        state.status_message.get_or_insert_with(|| first.to_string());
    }
    state.load_errors.extend(read_errors);
}
