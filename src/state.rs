use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::filter::{self, FilterParams, CATEGORY_COLUMN, THRESHOLD_RANGE};
use crate::data::model::{CellValue, Table};
use crate::data::registry::TableRegistry;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one dashboard session knows, independent of rendering.
///
/// Each handler below is one user interaction; every handler that can change
/// the visible rows ends by calling [`Session::refilter`].
#[derive(Default)]
pub struct Session {
    /// Tables from the most recent upload batch.
    pub registry: TableRegistry,

    /// Parse failures from the most recent upload batch.
    pub load_errors: Vec<DashboardError>,

    /// Name of the active table.
    pub selected: Option<String>,

    /// Current sidebar values.
    pub params: FilterParams,

    /// Rows of the active table passing `params` (cached).
    pub filtered: Option<Table>,

    /// Colours for the active table's `Category` values.
    pub category_colors: Option<ColorMap>,

    /// Error message shown in the UI.
    pub status_message: Option<String>,
}

impl Session {
    /// Replace the registry with a freshly parsed upload batch and select its first table.
    pub fn upload<N, B>(&mut self, files: impl IntoIterator<Item = (N, B)>)
    where
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let report = TableRegistry::load(files);
        self.registry = report.registry;
        self.load_errors = report.errors;
        self.status_message = self.load_errors.first().map(|e| e.to_string());

        let first = self.registry.names().next().map(str::to_string);
        match first {
            Some(name) => self.select_table(&name),
            None => {
                self.selected = None;
                self.filtered = None;
                self.category_colors = None;
            }
        }
    }

    /// Forget every uploaded table.
    pub fn clear(&mut self) {
        *self = Session::default();
    }

    /// The active table, if any.
    pub fn active_table(&self) -> Result<Option<&Table>> {
        match &self.selected {
            Some(name) => self.registry.resolve(name).map(Some),
            None => Ok(None),
        }
    }

    /// Make `name` the active table and reset the category selection to all of its values.
    pub fn select_table(&mut self, name: &str) {
        self.selected = Some(name.to_string());
        self.params.categories = None;
        self.category_colors = self
            .registry
            .resolve(name)
            .ok()
            .and_then(|t| t.unique_values(CATEGORY_COLUMN))
            .map(|values| ColorMap::new(&values));
        self.refilter();
    }

    pub fn set_missing_threshold0(&mut self, value: f64) {
        self.params.missing_threshold0 = clamp_threshold(value);
        self.refilter();
    }

    pub fn set_p_threshold(&mut self, value: f64) {
        self.params.p_threshold = clamp_threshold(value);
        self.refilter();
    }

    pub fn set_miss_threshold(&mut self, value: f64) {
        self.params.miss_threshold = clamp_threshold(value);
        self.refilter();
    }

    /// Every distinct `Category` value of the active table.
    pub fn all_categories(&self) -> Option<BTreeSet<CellValue>> {
        self.active_table()
            .ok()
            .flatten()
            .and_then(|t| t.unique_values(CATEGORY_COLUMN))
    }

    /// Whether a category value is currently selected.
    pub fn is_category_selected(&self, value: &CellValue) -> bool {
        self.params.category_selected(value)
    }

    /// Toggle a single `Category` value.
    pub fn toggle_category(&mut self, value: &CellValue) {
        let Some(all) = self.all_categories() else {
            return;
        };
        let selected = self.params.categories.get_or_insert(all);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select every `Category` value.
    pub fn select_all_categories(&mut self) {
        self.params.categories = None;
        self.refilter();
    }

    /// Deselect every `Category` value.
    pub fn select_no_categories(&mut self) {
        self.params.categories = Some(BTreeSet::new());
        self.refilter();
    }

    /// Recompute `filtered` from the active table and current parameters.
    ///
    /// On error the filtered view is cleared and the message kept for display.
    pub fn refilter(&mut self) {
        let outcome = self
            .active_table()
            .and_then(|table| table.map(|t| filter::apply(t, &self.params)).transpose());

        match outcome {
            Ok(filtered) => {
                self.filtered = filtered;
                self.status_message = self.load_errors.first().map(ToString::to_string);
            }
            Err(e) => {
                log::error!("Filtering failed: {e}");
                self.filtered = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn clamp_threshold(value: f64) -> f64 {
    value.clamp(*THRESHOLD_RANGE.start(), *THRESHOLD_RANGE.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "\
Category,C0_missing,ANCOVA_1,missing_x
lipid,0.1,0.01,0.05
amino,0.3,0.2,0.2
lipid,0.15,0.04,0.08
amino,0.05,0.2,0.02
lipid,0.25,0.5,0.3
";

    fn session() -> Session {
        let mut s = Session::default();
        s.upload([("results.csv", RESULTS), ("plain.csv", "gene,score\nx,1\ny,2\n")]);
        s
    }

    #[test]
    fn upload_selects_first_table_with_defaults() {
        let s = session();
        assert_eq!(s.selected.as_deref(), Some("results.csv"));
        assert_eq!(s.params, FilterParams::default());
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(1));
        assert!(s.status_message.is_none());
    }

    #[test]
    fn threshold_change_refilters() {
        let mut s = session();
        s.set_miss_threshold(0.15);
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(2));
        s.set_p_threshold(0.0);
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(0));
    }

    #[test]
    fn thresholds_are_clamped() {
        let mut s = session();
        s.set_missing_threshold0(3.0);
        assert_eq!(s.params.missing_threshold0, 1.0);
        s.set_p_threshold(-1.0);
        assert_eq!(s.params.p_threshold, 0.0);
    }

    #[test]
    fn toggling_a_category_refilters() {
        let mut s = session();
        s.set_miss_threshold(0.15);
        s.toggle_category(&CellValue::String("lipid".into()));
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(0));
        assert!(!s.is_category_selected(&CellValue::String("lipid".into())));
        assert!(s.is_category_selected(&CellValue::String("amino".into())));

        s.toggle_category(&CellValue::String("lipid".into()));
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(2));

        s.select_no_categories();
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(0));
        s.select_all_categories();
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(2));
    }

    #[test]
    fn selecting_another_table_resets_categories() {
        let mut s = session();
        s.select_no_categories();
        s.select_table("plain.csv");
        assert!(s.params.categories.is_none());
        assert!(s.category_colors.is_none());
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(2));
    }

    #[test]
    fn unknown_selection_surfaces_not_found() {
        let mut s = session();
        s.select_table("nope.csv");
        assert!(s.filtered.is_none());
        let msg = s.status_message.unwrap();
        assert!(msg.contains("nope.csv"), "{msg}");
    }

    #[test]
    fn type_mismatch_halts_the_render() {
        let mut s = Session::default();
        s.upload([("bad.csv", "ANCOVA_1\n0.01\noops\n")]);
        assert!(s.filtered.is_none());
        assert!(s.status_message.unwrap().contains("ANCOVA_1"));
    }

    #[test]
    fn parse_errors_are_reported_alongside_good_tables() {
        let mut s = Session::default();
        s.upload([("bad.csv", "a,b\n1\n"), ("good.csv", "a\n1\n")]);
        assert_eq!(s.registry.len(), 1);
        assert_eq!(s.selected.as_deref(), Some("good.csv"));
        assert!(s.status_message.unwrap().contains("bad.csv"));
    }

    #[test]
    fn clean_table_replaces_a_stale_filter_error() {
        let mut s = Session::default();
        s.upload([
            ("bad.csv", "a,b\n1\n"),
            ("mm.csv", "ANCOVA_1\noops\n"),
            ("ok.csv", "ANCOVA_1\n0.01\n"),
        ]);
        assert!(s.status_message.as_deref().unwrap().contains("ANCOVA_1"));

        s.select_table("ok.csv");
        assert_eq!(s.filtered.as_ref().map(Table::len), Some(1));
        let msg = s.status_message.unwrap();
        assert!(msg.contains("bad.csv"), "{msg}");
        assert!(!msg.contains("oops"), "{msg}");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut s = session();
        s.clear();
        assert!(s.registry.is_empty());
        assert!(s.selected.is_none());
        assert!(s.filtered.is_none());
    }
}
