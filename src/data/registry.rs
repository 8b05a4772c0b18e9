use crate::error::{DashboardError, Result};

use super::loader::parse_table;
use super::model::Table;

/// Outcome of loading one upload batch: every file that parsed, plus one
/// [`DashboardError::Parse`] per file that did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registry: TableRegistry,
    pub errors: Vec<DashboardError>,
}

/// Uploaded tables keyed by file name, in upload order.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl TableRegistry {
    /// Parse a batch of `(file name, raw bytes)` uploads.
    ///
    /// A file that fails to parse is reported and skipped; the rest are kept.
    /// When two files share a name the first one wins.
    pub fn load<N, B>(files: impl IntoIterator<Item = (N, B)>) -> LoadReport
    where
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let mut report = LoadReport::default();

        for (name, bytes) in files {
            let name = name.as_ref();
            if report.registry.contains(name) {
                log::warn!("Skipping duplicate upload '{name}'");
                continue;
            }
            match parse_table(name, bytes.as_ref()) {
                Ok(table) => {
                    log::info!(
                        "Loaded '{name}': {} rows, columns {:?}",
                        table.len(),
                        table.columns
                    );
                    report.registry.tables.push(table);
                }
                Err(e) => {
                    log::error!("Failed to parse '{name}': {e:#}");
                    report.errors.push(DashboardError::Parse {
                        file: name.to_string(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        report
    }

    /// Look up a table by its file name.
    pub fn resolve(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DashboardError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    /// File names in upload order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn registers_under_exact_names_and_resolves_the_right_file() {
        let report = TableRegistry::load([
            ("a.csv", "x\n1\n"),
            ("b.csv", "y\n2\n"),
        ]);
        assert!(report.errors.is_empty());
        let names: Vec<_> = report.registry.names().collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);

        let b = report.registry.resolve("b.csv").unwrap();
        assert_eq!(b.columns, vec!["y"]);
        assert_eq!(b.rows[0][0], CellValue::Integer(2));
    }

    #[test]
    fn parse_failure_keeps_other_files() {
        let report = TableRegistry::load([
            ("good.csv", "a,b\n1,2\n"),
            ("bad.csv", "a,b\n1\n"),
            ("also_good.csv", "c\n3\n"),
        ]);
        assert_eq!(report.registry.len(), 2);
        assert!(report.registry.contains("also_good.csv"));
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            DashboardError::Parse { file, .. } => assert_eq!(file, "bad.csv"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_name_is_not_found() {
        let report = TableRegistry::load([("a.csv", "x\n1\n")]);
        assert_eq!(
            report.registry.resolve("zzz.csv").unwrap_err(),
            DashboardError::NotFound("zzz.csv".into())
        );
    }

    #[test]
    fn duplicate_name_keeps_first() {
        let report = TableRegistry::load([("a.csv", "first\n1\n"), ("a.csv", "second\n2\n")]);
        assert_eq!(report.registry.len(), 1);
        assert_eq!(report.registry.resolve("a.csv").unwrap().columns, vec!["first"]);
    }

    #[test]
    fn empty_batch_is_empty_registry() {
        let report = TableRegistry::load(Vec::<(String, Vec<u8>)>::new());
        assert!(report.registry.is_empty());
        assert!(report.errors.is_empty());
    }
}
