use std::path::PathBuf;

use crate::errors::{CleanseError, CleanseResult};
use crate::excel;
use crate::reference::ReferenceStore;
use crate::types::RawTable;

/// Local export of the shared spreadsheet (.xlsx/.ods), one worksheet per category.
#[derive(Debug, Clone)]
pub struct WorkbookStore {
    path: PathBuf,
}

impl WorkbookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReferenceStore for WorkbookStore {
    fn fetch_table(&self, worksheet: &str) -> CleanseResult<RawTable> {
        excel::read_table(&self.path, Some(worksheet)).map_err(|e| match e {
            CleanseError::SheetNotFound { sheet, .. } => CleanseError::WorksheetNotFound { worksheet: sheet },
            other => other,
        })
    }

    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn missing_worksheet_is_reported_as_reference_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("WSA").unwrap();
        workbook.save(&path).unwrap();

        let store = WorkbookStore::new(&path);
        let err = store.fetch_table("WAPPR").unwrap_err();
        assert!(matches!(err, CleanseError::WorksheetNotFound { ref worksheet } if worksheet == "WAPPR"));
        assert!(err.to_string().starts_with("Reference worksheet"));
    }
}
