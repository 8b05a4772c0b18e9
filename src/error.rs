use thiserror::Error;

/// Errors surfaced to the user as a visible message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// A file could not be read as a table.
    #[error("failed to parse '{file}': {reason}")]
    Parse { file: String, reason: String },

    /// A non-numeric cell in a column compared against a numeric threshold.
    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    TypeMismatch {
        column: String,
        row: usize,
        value: String,
    },

    /// The selection names a table that was never registered.
    #[error("no table named '{0}'")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
