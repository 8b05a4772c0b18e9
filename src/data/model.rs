use std::collections::BTreeSet;
use std::fmt;

/// Text read as a missing value, the same set pandas' `read_csv` uses.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value inferred from CSV text.
/// Category selections live in a `BTreeSet`, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Blank cell.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Infer the narrowest type for a raw text cell.
    ///
    /// Blank cells and the usual missing-value markers (`NA`, `NaN`, `#N/A`, ...)
    /// become [`CellValue::Null`].
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || NA_TOKENS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::String(s.to_string()),
        }
    }

    /// Numeric view of the cell; bools count as 1/0, `None` for strings and blanks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – one uploaded file
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column names and row-major cells.
///
/// Every row holds exactly `columns.len()` cells; the loaders enforce this.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// File name the table was loaded from.
    pub name: String,
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Rows of cells, one per column.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Positions of every column whose name contains `needle`.
    pub fn columns_containing(&self, needle: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.contains(needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Sorted set of distinct values in a column, `None` if the column is absent.
    pub fn unique_values(&self, column: &str) -> Option<BTreeSet<CellValue>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// A new table with the same columns and only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_picks_narrowest_type() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer("  "), CellValue::Null);
        assert_eq!(CellValue::infer("3"), CellValue::Integer(3));
        assert_eq!(CellValue::infer("0.25"), CellValue::Float(0.25));
        assert_eq!(CellValue::infer("1e-3"), CellValue::Float(0.001));
        assert_eq!(CellValue::infer("True"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("lipid"), CellValue::String("lipid".into()));
    }

    #[test]
    fn infer_treats_na_markers_as_blank() {
        for token in ["NA", "N/A", "NaN", "nan", "null", "#N/A", "None", " NA "] {
            assert_eq!(CellValue::infer(token), CellValue::Null, "{token:?}");
        }
        assert_eq!(CellValue::infer("NAD"), CellValue::String("NAD".into()));
    }

    #[test]
    fn bools_are_numeric() {
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::Bool(false).as_f64(), Some(0.0));
        assert_eq!(CellValue::String("x".into()).as_f64(), None);
    }

    #[test]
    fn ordering_groups_by_kind() {
        let set: BTreeSet<CellValue> = [
            CellValue::String("b".into()),
            CellValue::Null,
            CellValue::Float(0.5),
            CellValue::Integer(2),
            CellValue::String("a".into()),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered[0], CellValue::Null);
        assert_eq!(ordered[1], CellValue::Integer(2));
        assert_eq!(ordered[2], CellValue::Float(0.5));
        assert_eq!(ordered[3], CellValue::String("a".into()));
    }

    #[test]
    fn columns_containing_is_substring_and_case_sensitive() {
        let table = Table::new(
            "t.csv",
            vec![
                "C0_missing".into(),
                "ANCOVA_1".into(),
                "p_ancova".into(),
                "x_ANCOVA_adj".into(),
            ],
            Vec::new(),
        );
        assert_eq!(table.columns_containing("ANCOVA"), vec![1, 3]);
        assert_eq!(table.columns_containing("missing"), vec![0]);
        assert!(table.columns_containing("Category").is_empty());
    }

    #[test]
    fn select_rows_keeps_columns() {
        let table = Table::new(
            "t.csv",
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Null],
                vec![CellValue::Integer(2), CellValue::Null],
                vec![CellValue::Integer(3), CellValue::Null],
            ],
        );
        let sub = table.select_rows(&[0, 2]);
        assert_eq!(sub.columns, table.columns);
        assert_eq!(sub.rows, vec![table.rows[0].clone(), table.rows[2].clone()]);
        assert_eq!(sub.name, "t.csv");
    }

    #[test]
    fn unique_values_absent_column() {
        let table = Table::new("t.csv", vec!["a".into()], vec![vec![CellValue::Integer(1)]]);
        assert!(table.unique_values("Category").is_none());
        assert_eq!(table.unique_values("a").map(|s| s.len()), Some(1));
    }
}
