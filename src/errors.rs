//! Error and warning types for a cleanse run.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanseError {
    #[error("Required column '{column}' not found in input (category {category})")]
    MissingColumn { column: String, category: String },

    #[error("Reference worksheet '{worksheet}' not found")]
    WorksheetNotFound { worksheet: String },

    #[error("Worksheet '{sheet}' not found in {path}")]
    SheetNotFound { sheet: String, path: String },

    #[error("Reference column '{column}' not found in worksheet '{worksheet}'")]
    ReferenceColumnMissing { worksheet: String, column: String },

    #[error("Invalid month {0}; expected a value from 1 to 12")]
    InvalidMonth(u32),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Could not read input: {0}")]
    Input(String),

    #[error("Could not write output: {0}")]
    Output(String),

    #[error("Reference store unreachable: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CleanseError {
    /// Caller or input-shape mistakes. These are surfaced as-is and never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CleanseError::MissingColumn { .. }
                | CleanseError::WorksheetNotFound { .. }
                | CleanseError::SheetNotFound { .. }
                | CleanseError::ReferenceColumnMissing { .. }
                | CleanseError::InvalidMonth(_)
                | CleanseError::UnknownCategory(_)
                | CleanseError::UnsupportedFormat { .. }
                | CleanseError::InvalidConfig { .. }
        )
    }
}

pub type CleanseResult<T> = Result<T, CleanseError>;

/// Non-fatal data-quality findings reported alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataWarning {
    /// Created-at values that could not be parsed (rows kept with no timestamp).
    #[serde(rename_all = "camelCase")]
    UnparsableTimestamps { count: usize },
    /// The month filter removed every remaining row.
    #[serde(rename_all = "camelCase")]
    MonthFilterEmptied { months: Vec<u32>, dropped: usize },
    /// A month filter was requested but the upload has no created-at column.
    MonthFilterSkipped,
    /// A secondary filter column (order type or status) is missing from the upload.
    #[serde(rename_all = "camelCase")]
    FilterColumnAbsent { column: String },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataWarning::UnparsableTimestamps { count } => {
                write!(f, "{count} created-at value(s) could not be parsed")
            }
            DataWarning::MonthFilterEmptied { months, dropped } => write!(
                f,
                "month filter {months:?} removed all {dropped} remaining row(s); check the selected months"
            ),
            DataWarning::MonthFilterSkipped => {
                write!(f, "month filter skipped: upload has no created-at column")
            }
            DataWarning::FilterColumnAbsent { column } => {
                write!(f, "filter on '{column}' skipped: column not in upload")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        let missing = CleanseError::MissingColumn {
            column: "SC Order No/Track ID/CSRM No".to_string(),
            category: "wsa".to_string(),
        };
        assert!(missing.is_configuration());
        assert!(CleanseError::InvalidMonth(13).is_configuration());
        assert!(!CleanseError::Transport("timeout".to_string()).is_configuration());
        assert!(!CleanseError::Input("bad zip".to_string()).is_configuration());
    }

    #[test]
    fn month_warning_mentions_months() {
        let w = DataWarning::MonthFilterEmptied {
            months: vec![1, 2],
            dropped: 4,
        };
        let text = w.to_string();
        assert!(text.contains("[1, 2]"));
        assert!(text.contains("4"));
    }
}
