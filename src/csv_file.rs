//! CSV uploads and CSV result files.

use csv::{ReaderBuilder, WriterBuilder};
use std::io::Read;
use std::path::Path;

use crate::errors::{CleanseError, CleanseResult};
use crate::export::{export_headers, export_row};
use crate::models::ColumnMap;
use crate::types::{OrderRecord, RawTable};

/// Non-UTF-8 bytes (legacy Windows exports) become U+FFFD instead of failing the row.
fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Parse CSV text with a header row. Short rows are padded; blank rows skipped.
pub fn read_table_from<R: Read>(reader: R) -> CleanseResult<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers: Vec<String> = rdr
        .byte_headers()
        .map_err(|e| CleanseError::Input(format!("CSV header: {}", e)))?
        .iter()
        .map(|h| lossy(h).trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    let width = headers.len();
    let mut rows = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let record = result.map_err(|e| CleanseError::Input(format!("CSV row {}: {}", i + 2, e)))?;
        let mut cells: Vec<String> = record.iter().take(width).map(lossy).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        cells.resize(width, String::new());
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

pub fn read_table(path: &Path) -> CleanseResult<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CleanseError::Input(format!("File not found: {}", path.display()))
        } else {
            CleanseError::Io(e)
        }
    })?;
    read_table_from(file)
}

pub fn write_orders(path: &Path, records: &[OrderRecord], columns: &ColumnMap) -> CleanseResult<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .map_err(|e| CleanseError::Output(format!("Cannot write {}: {}", path.display(), e)))?;
    let to_output = |e: csv::Error| CleanseError::Output(e.to_string());
    wtr.write_record(export_headers(columns)).map_err(to_output)?;
    for record in records {
        wtr.write_record(export_row(record)).map_err(to_output)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_field_keeps_row() {
        let bytes: &[u8] = b"SC Order No/Track ID/CSRM No,Address\nAO1_A,Jl. Caf\xE9\nAO2_B,Jl. Dago\n";
        let table = read_table_from(bytes).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "AO1_A");
        assert_eq!(table.rows[0][1], "Jl. Caf\u{FFFD}");
        assert_eq!(table.rows[1][1], "Jl. Dago");
    }

    #[test]
    fn reads_ragged_rows() {
        let text = "\u{feff}SC Order No/Track ID/CSRM No,Workzone,Status\nAO1_A,BDG\n,,\nAO2_B,AMB,WAPPR,extra\n";
        let table = read_table_from(text.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "SC Order No/Track ID/CSRM No");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["AO1_A", "BDG", ""]);
        assert_eq!(table.rows[1], vec!["AO2_B", "AMB", "WAPPR"]);
    }
}
