//! Print the sheets, headers and first rows of a report workbook.
//!
//! Usage: dump_sheet <path.xlsx> [sheet name] [rows]

use order_cleanse_lib::{excel, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

const DEFAULT_PREVIEW_ROWS: usize = 5;

fn main() -> ExitCode {
    logging::init("info");
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: dump_sheet <path.xlsx> [sheet name] [rows]");
        return ExitCode::from(2);
    };
    let sheet = args.next();
    let preview = args
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_PREVIEW_ROWS);

    let sheets = match excel::get_sheet_names(&path) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Sheets: {}", sheets.join(", "));

    let headers = match excel::get_excel_headers(&path, sheet.as_deref()) {
        Ok(h) => h,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("\nHeaders:");
    for h in &headers {
        println!("  {} ({}): {:?}", h.column_letter, h.column_index, h.header_text);
    }

    let table = match excel::read_table(&path, sheet.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("\n{} data row(s); first {}:", table.rows.len(), preview.min(table.rows.len()));
    for (i, row) in table.rows.iter().take(preview).enumerate() {
        println!("  row {}: {:?}", i + 2, row);
    }
    ExitCode::SUCCESS
}
