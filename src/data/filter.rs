use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::error::{DashboardError, Result};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Column conventions and widget bounds
// ---------------------------------------------------------------------------

/// Column holding the per-row fraction of missing data in the first condition.
pub const C0_MISSING_COLUMN: &str = "C0_missing";
/// Column holding the categorical label.
pub const CATEGORY_COLUMN: &str = "Category";
/// Substring marking p-value columns.
pub const ANCOVA_MARKER: &str = "ANCOVA";
/// Substring marking missing-data columns.
pub const MISSING_MARKER: &str = "missing";

pub const THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const MISSING_THRESHOLD0_STEP: f64 = 0.05;
pub const P_THRESHOLD_STEP: f64 = 0.01;
pub const MISS_THRESHOLD_STEP: f64 = 0.01;

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Threshold and selection values driving [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Upper bound (inclusive) for `C0_missing`.
    pub missing_threshold0: f64,
    /// Upper bound (exclusive) for every `ANCOVA` column.
    pub p_threshold: f64,
    /// Upper bound (inclusive) for every `missing` column.
    pub miss_threshold: f64,
    /// Selected `Category` values. `None` selects every value present.
    pub categories: Option<BTreeSet<CellValue>>,
}

impl Default for FilterParams {
    fn default() -> Self {
        FilterParams {
            missing_threshold0: 0.2,
            p_threshold: 0.05,
            miss_threshold: 0.1,
            categories: None,
        }
    }
}

impl FilterParams {
    /// Whether `value` passes the category selection.
    pub fn category_selected(&self, value: &CellValue) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |selected| selected.contains(value))
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Return indices of rows that pass every stage, in table order.
///
/// Stages, each skipped when its column is absent:
/// 1. `C0_missing <= missing_threshold0`
/// 2. `Category` is in the selection
/// 3. every column containing `ANCOVA` is `< p_threshold`
/// 4. every column containing `missing` is `<= miss_threshold`
///
/// Stages 3 and 4 hold for every row when no column matches.
/// Blank cells never satisfy a threshold and bools compare as 1/0; text in a
/// thresholded column is a [`DashboardError::TypeMismatch`].
pub fn filtered_indices(table: &Table, params: &FilterParams) -> Result<Vec<usize>> {
    let c0_missing = table.column_index(C0_MISSING_COLUMN);
    let category = table.column_index(CATEGORY_COLUMN);
    let ancova_cols = table.columns_containing(ANCOVA_MARKER);
    let missing_cols = table.columns_containing(MISSING_MARKER);

    let mut kept = Vec::with_capacity(table.len());

    for (row_no, row) in table.rows.iter().enumerate() {
        if let Some(col) = c0_missing {
            let value = numeric_at(table, row, row_no, col)?;
            if !value.is_some_and(|v| v <= params.missing_threshold0) {
                continue;
            }
        }

        if let Some(col) = category {
            if !params.category_selected(&row[col]) {
                continue;
            }
        }

        if !all_numeric(table, row, row_no, &ancova_cols, |v| v < params.p_threshold)? {
            continue;
        }

        if !all_numeric(table, row, row_no, &missing_cols, |v| v <= params.miss_threshold)? {
            continue;
        }

        kept.push(row_no);
    }

    log::debug!(
        "{}: {} of {} rows pass filters",
        table.name,
        kept.len(),
        table.len()
    );
    Ok(kept)
}

/// Apply every stage and materialise the surviving rows as a new table.
pub fn apply(table: &Table, params: &FilterParams) -> Result<Table> {
    let indices = filtered_indices(table, params)?;
    Ok(table.select_rows(&indices))
}

/// `pred` holds for the cell in every listed column (true for an empty list).
fn all_numeric(
    table: &Table,
    row: &[CellValue],
    row_no: usize,
    cols: &[usize],
    pred: impl Fn(f64) -> bool,
) -> Result<bool> {
    for &col in cols {
        if !numeric_at(table, row, row_no, col)?.is_some_and(&pred) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Numeric value of a cell, `None` for blanks.
fn numeric_at(table: &Table, row: &[CellValue], row_no: usize, col: usize) -> Result<Option<f64>> {
    let cell = &row[col];
    if cell.is_null() {
        return Ok(None);
    }
    cell.as_f64().map(Some).ok_or_else(|| DashboardError::TypeMismatch {
        column: table.columns[col].clone(),
        row: row_no,
        value: cell.to_string(),
    })
}
