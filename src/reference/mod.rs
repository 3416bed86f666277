//! Reference store: the shared sheet that already lists known orders.
//!
//! The store is read once per run into a [`ReferenceKeySet`] snapshot; nothing
//! is ever written back.

mod published;
mod workbook;

pub use published::{PublishedSheetStore, SheetsHandle, DEFAULT_SHEETS_BASE_URL};
pub use workbook::WorkbookStore;

use std::collections::HashSet;
use tracing::{info, warn};

use crate::errors::{CleanseError, CleanseResult};
use crate::models::{Category, ColumnMap};
use crate::services::keys::normalize_key;
use crate::types::RawTable;

/// Source of reference worksheets (one worksheet per category).
pub trait ReferenceStore {
    /// Current contents of `worksheet`, header row first.
    fn fetch_table(&self, worksheet: &str) -> CleanseResult<RawTable>;

    /// Short human description for logs and summaries.
    fn describe(&self) -> String;
}

/// Normalized keys already present in the reference sheet. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ReferenceKeySet {
    keys: HashSet<String>,
}

impl ReferenceKeySet {
    pub fn from_values<'a, I: IntoIterator<Item = &'a str>>(values: I) -> Self {
        let keys = values
            .into_iter()
            .map(normalize_key)
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Fetch the category's worksheet and collect its dedup-key column.
pub fn load_keys(
    store: &dyn ReferenceStore,
    category: Category,
    columns: &ColumnMap,
) -> CleanseResult<ReferenceKeySet> {
    let rules = category.rules();
    let worksheet = rules.reference_worksheet;
    let table = store.fetch_table(worksheet)?;
    let column = columns.header(rules.dedup_key.field());
    let values = table
        .column_values(column)
        .ok_or_else(|| CleanseError::ReferenceColumnMissing {
            worksheet: worksheet.to_string(),
            column: column.to_string(),
        })?;
    let keys = ReferenceKeySet::from_values(values);
    info!(
        store = %store.describe(),
        worksheet,
        rows = table.rows.len(),
        keys = keys.len(),
        "loaded reference snapshot"
    );
    if keys.is_empty() {
        warn!(worksheet, column, "reference column holds no keys; every row counts as new");
    }
    Ok(keys)
}
