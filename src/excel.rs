use calamine::{open_workbook_auto, Data, DataType, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::errors::{CleanseError, CleanseResult};
use crate::export::{export_headers, export_row};
use crate::models::ColumnMap;
use crate::types::{OrderRecord, RawTable};

/// Column index to Excel letter (0→A, 1→B, 25→Z, 26→AA).
pub fn col_index_to_letter(index: u32) -> String {
    let mut n = index;
    let mut s = String::new();
    loop {
        let r = (n % 26) as u8;
        s.insert(0, (b'A' + r) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    s
}

/// Header with its column letter and index, for the inspect listing.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelHeader {
    pub column_letter: String,
    pub header_text: String,
    pub column_index: u32,
}

/// Cell as text. Dates become "YYYY-mm-dd HH:MM:SS"; whole floats lose their ".0".
pub fn cell_text(cell: &Data) -> String {
    if cell.is_datetime() {
        if let Some(dt) = cell.as_datetime() {
            return dt.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    if let Some(f) = cell.get_float() {
        if f.fract() == 0.0 && f.abs() < 1e15 {
            return format!("{}", f as i64);
        }
    }
    cell.as_string().unwrap_or_default()
}

fn open_range(path: &Path, sheet_name: Option<&str>) -> CleanseResult<(String, calamine::Range<Data>)> {
    if !path.exists() {
        return Err(CleanseError::Input(format!("File not found: {}", path.display())));
    }
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CleanseError::Input(format!("Could not open {}: {}", path.display(), e)))?;
    let name = match sheet_name {
        Some(n) => n.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CleanseError::Input(format!("{} has no worksheets", path.display())))?,
    };
    if !workbook.sheet_names().iter().any(|s| s == &name) {
        return Err(CleanseError::SheetNotFound {
            sheet: name,
            path: path.display().to_string(),
        });
    }
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| CleanseError::Input(format!("Sheet '{}' could not be read: {}", name, e)))?;
    Ok((name, range))
}

/// Get list of sheet names from workbook.
pub fn get_sheet_names(path: &Path) -> CleanseResult<Vec<String>> {
    if !path.exists() {
        return Err(CleanseError::Input(format!("File not found: {}", path.display())));
    }
    let workbook = open_workbook_auto(path)
        .map_err(|e| CleanseError::Input(format!("Could not open {}: {}", path.display(), e)))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read a sheet (first one when `sheet_name` is None) with row 1 as headers.
/// Trailing blank headers are dropped and fully empty rows skipped.
pub fn read_table(path: &Path, sheet_name: Option<&str>) -> CleanseResult<RawTable> {
    let (_, range) = open_range(path, sheet_name)?;
    let mut rows = range.rows();
    let mut headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(c).trim().to_string()).collect())
        .unwrap_or_default();
    while headers.last().map_or(false, |h| h.is_empty()) {
        headers.pop();
    }
    let width = headers.len();
    let data = rows
        .map(|row| {
            let mut cells: Vec<String> = row.iter().take(width).map(cell_text).collect();
            cells.resize(width, String::new());
            cells
        })
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .collect();
    Ok(RawTable {
        headers,
        rows: data,
    })
}

/// Headers of a sheet with column letter and index.
pub fn get_excel_headers(path: &Path, sheet_name: Option<&str>) -> CleanseResult<Vec<ExcelHeader>> {
    let table = read_table(path, sheet_name)?;
    Ok(table
        .headers
        .into_iter()
        .enumerate()
        .map(|(i, header_text)| ExcelHeader {
            column_letter: col_index_to_letter(i as u32),
            header_text,
            column_index: i as u32,
        })
        .collect())
}

/// Drop control characters that corrupt sheet XML (tab, newline and CR are kept).
fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            let u = c as u32;
            c == '\t' || c == '\n' || c == '\r' || !(u < 0x20 || u == 0x7F || u == 0xFFFE || u == 0xFFFF)
        })
        .collect()
}

/// Estimate column width from text length (char count × 1.2, clamped 10–50).
fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 50.0)
}

fn calculate_column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<f64> {
    let mut widths: Vec<f64> = headers.iter().map(|h| estimate_text_width(h)).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = w.max(estimate_text_width(value));
            }
        }
    }
    widths
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<(), XlsxError> {
    worksheet.set_name(sheet_name)?;
    let header_format = Format::new()
        .set_bold()
        .set_background_color(rust_xlsxwriter::Color::RGB(0x2563EB))
        .set_font_color(rust_xlsxwriter::Color::RGB(0xFFFFFF));

    for (col, &w) in calculate_column_widths(headers, rows).iter().enumerate() {
        worksheet.set_column_width(col as u16, w)?;
    }
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, sanitize_cell(header), &header_format)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string(row_num, col as u16, sanitize_cell(value))?;
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Write the result sheet. Every cell is text, dates included.
pub fn write_orders(
    path: &Path,
    sheet_name: &str,
    records: &[OrderRecord],
    columns: &ColumnMap,
) -> CleanseResult<()> {
    let headers = export_headers(columns);
    let rows: Vec<Vec<String>> = records.iter().map(export_row).collect();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_sheet(worksheet, sheet_name, &headers, &rows)
        .map_err(|e| CleanseError::Output(format!("{} ({})", e, path.display())))?;
    workbook.save(path).map_err(|e| {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("being used") {
            CleanseError::Output(format!("{} is open elsewhere; close it first", path.display()))
        } else {
            CleanseError::Output(format!("Cannot write {}: {}", path.display(), msg))
        }
    })?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote workbook");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_roll_over() {
        assert_eq!(col_index_to_letter(0), "A");
        assert_eq!(col_index_to_letter(25), "Z");
        assert_eq!(col_index_to_letter(26), "AA");
        assert_eq!(col_index_to_letter(27), "AB");
    }

    #[test]
    fn float_cells_lose_artifact() {
        assert_eq!(cell_text(&Data::Float(81234.0)), "81234");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::String("AO1_A".into())), "AO1_A");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn unknown_upload_sheet_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        write_orders(&path, "Report", &[], &ColumnMap::default()).unwrap();

        let err = read_table(&path, Some("Sheet9")).unwrap_err();
        assert!(matches!(err, CleanseError::SheetNotFound { ref sheet, .. } if sheet == "Sheet9"));
        assert!(!err.to_string().contains("Reference"));
        assert!(err.is_configuration());
        assert_eq!(read_table(&path, None).unwrap().headers.len(), 13);
    }

    #[test]
    fn sanitize_keeps_text_drops_control() {
        assert_eq!(sanitize_cell("a\u{1}b\tc"), "ab\tc");
        assert_eq!(sanitize_cell("Jl. A & B <1>"), "Jl. A & B <1>");
    }
}
