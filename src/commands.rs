//! Command layer: wires batch source, reference store, normalizer and result sink.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::{CleanArgs, InspectArgs};
use crate::config::Settings;
use crate::csv_file;
use crate::errors::{CleanseError, CleanseResult, DataWarning};
use crate::excel;
use crate::models::{Category, ColumnMap, Field};
use crate::reference::{self, PublishedSheetStore, ReferenceStore, SheetsHandle, WorkbookStore};
use crate::services::normalizer::check_required_columns;
use crate::services::{normalize, NormalizeOutcome};
use crate::types::{MonthFilter, OrderBatch, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Workbook,
    Csv,
}

pub fn file_kind(path: &Path) -> CleanseResult<FileKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileKind::Workbook),
        "csv" => Ok(FileKind::Csv),
        _ => Err(CleanseError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Read an uploaded report; format picked from the extension.
pub fn read_upload(path: &Path, sheet: Option<&str>) -> CleanseResult<RawTable> {
    match file_kind(path)? {
        FileKind::Workbook => excel::read_table(path, sheet),
        FileKind::Csv => csv_file::read_table(path),
    }
}

pub fn write_result(
    path: &Path,
    category: Category,
    outcome: &NormalizeOutcome,
    columns: &ColumnMap,
) -> CleanseResult<()> {
    match file_kind(path)? {
        FileKind::Csv => csv_file::write_orders(path, &outcome.records, columns),
        FileKind::Workbook if path.extension().map_or(false, |e| e.eq_ignore_ascii_case("xlsx")) => {
            excel::write_orders(
                path,
                category.rules().reference_worksheet,
                &outcome.records,
                columns,
            )
        }
        FileKind::Workbook => Err(CleanseError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn default_output_name(category: Category, now: DateTime<Local>) -> String {
    format!("new_orders_{}_{}.xlsx", category, now.format("%Y%m%d_%H%M%S"))
}

fn load_columns(path: Option<&Path>) -> CleanseResult<ColumnMap> {
    match path {
        Some(p) => ColumnMap::load(p),
        None => Ok(ColumnMap::default()),
    }
}

/// Pick the reference store: CLI flags first, then settings.
pub fn open_reference<'a>(
    args: &CleanArgs,
    settings: &Settings,
    handle: &'a SheetsHandle,
) -> CleanseResult<Box<dyn ReferenceStore + 'a>> {
    if let Some(path) = &args.reference_workbook {
        return Ok(Box::new(WorkbookStore::new(path.clone())));
    }
    if let Some(id) = &args.reference_sheet_id {
        return Ok(Box::new(PublishedSheetStore::new(handle, id.clone())));
    }
    if let Some(path) = &settings.reference_workbook {
        return Ok(Box::new(WorkbookStore::new(path.clone())));
    }
    if let Some(id) = &settings.reference_sheet_id {
        return Ok(Box::new(PublishedSheetStore::new(handle, id.clone())));
    }
    Err(CleanseError::InvalidConfig {
        field: "reference".to_string(),
        value: "none given (use --reference-workbook or --reference-sheet-id)".to_string(),
    })
}

/// Upload -> normalize against the store's snapshot. Nothing is written.
pub fn process_upload(
    table: &RawTable,
    category: Category,
    months: &MonthFilter,
    store: &dyn ReferenceStore,
    columns: &ColumnMap,
) -> CleanseResult<NormalizeOutcome> {
    let batch = OrderBatch::from_table(table, columns);
    check_required_columns(&batch, category, columns)?;
    if batch.is_empty() {
        warn!(category = %category, "upload has a header row but no data rows");
    }
    let reference = reference::load_keys(store, category, columns)?;
    normalize(&batch, category, months, &reference, columns)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub category: Category,
    pub input: String,
    pub reference: String,
    pub input_rows: usize,
    pub filtered_count: usize,
    pub final_count: usize,
    pub warnings: Vec<DataWarning>,
    pub output: String,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Found {} new {} order(s) ({} matched the filters, {} rows read). Saved to {}",
            self.final_count, self.category, self.filtered_count, self.input_rows, self.output
        )
    }
}

pub fn clean(args: &CleanArgs, settings: &Settings, handle: &SheetsHandle) -> CleanseResult<RunSummary> {
    let columns = load_columns(args.columns.as_deref())?;
    let months = MonthFilter::new(args.months.iter().copied())?;
    let store = open_reference(args, settings, handle)?;

    let table = read_upload(&args.input, args.sheet.as_deref())?;
    info!(input = %args.input.display(), rows = table.rows.len(), category = %args.category, "read upload");
    let outcome = process_upload(&table, args.category, &months, store.as_ref(), &columns)?;

    let output = match &args.output {
        Some(p) => p.clone(),
        None => {
            let name = default_output_name(args.category, Local::now());
            match &settings.output_dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_result(&output, args.category, &outcome, &columns)?;
    info!(output = %output.display(), new = outcome.final_count, "wrote result");

    Ok(RunSummary {
        category: args.category,
        input: args.input.display().to_string(),
        reference: store.describe(),
        input_rows: table.rows.len(),
        filtered_count: outcome.filtered_count,
        final_count: outcome.final_count,
        warnings: outcome.warnings,
        output: output.display().to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReadiness {
    pub category: Category,
    pub missing_columns: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub sheets: Vec<String>,
    pub headers: Vec<excel::ExcelHeader>,
    pub data_rows: usize,
    pub unmapped_fields: Vec<String>,
    pub categories: Vec<CategoryReadiness>,
}

pub fn inspect(args: &InspectArgs) -> CleanseResult<InspectReport> {
    let columns = load_columns(args.columns.as_deref())?;
    let sheets = match file_kind(&args.input)? {
        FileKind::Workbook => excel::get_sheet_names(&args.input)?,
        FileKind::Csv => Vec::new(),
    };
    let table = read_upload(&args.input, args.sheet.as_deref())?;
    let headers = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| excel::ExcelHeader {
            column_letter: excel::col_index_to_letter(i as u32),
            header_text: h.clone(),
            column_index: i as u32,
        })
        .collect();
    let batch = OrderBatch::from_table(&table, &columns);
    let unmapped_fields = Field::ALL
        .iter()
        .filter(|f| !batch.has(**f))
        .map(|f| columns.header(*f).to_string())
        .collect();
    let categories = Category::ALL
        .iter()
        .map(|&category| CategoryReadiness {
            category,
            missing_columns: category
                .required_fields()
                .into_iter()
                .filter(|f| !batch.has(*f))
                .map(|f| columns.header(f).to_string())
                .collect(),
        })
        .collect();
    Ok(InspectReport {
        sheets,
        headers,
        data_rows: table.rows.len(),
        unmapped_fields,
        categories,
    })
}
