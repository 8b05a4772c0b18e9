use eframe::egui;

use crate::state::Session;
use crate::ui::{panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Upload,
    Filters,
}

#[derive(Default)]
pub struct DashboardApp {
    pub state: Session,
    tab: Tab,
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_tables = !self.state.registry.is_empty();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Upload, "Upload Files");
                ui.selectable_value(&mut self.tab, Tab::Filters, "Filters and Analysis");
            });
            ui.separator();

            match self.tab {
                Tab::Upload => tables::upload_tab(ui, &mut self.state),
                Tab::Filters => tables::filters_tab(ui, &mut self.state),
            }
        });

        // Jump to the analysis once the first batch lands.
        if !had_tables && !self.state.registry.is_empty() {
            self.tab = Tab::Filters;
        }
    }
}
