//! Shared fixtures: report rows and workbooks written into temp directories.

#![allow(dead_code)]

use order_cleanse_lib::models::ColumnMap;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Report headers in the column order the fixtures use.
pub fn report_headers() -> Vec<String> {
    let c = ColumnMap::default();
    vec![
        c.order_key,
        c.order_type,
        c.status,
        c.created_at,
        c.work_order_id,
        c.customer_name,
        c.contact_number,
        c.workzone,
        c.service_no,
        c.address,
        c.booking_date,
    ]
}

/// One report row: key, type, status, created, workorder, customer, contact, workzone.
/// Service number, address and booking date are filled from the key.
pub fn report_row(
    key: &str,
    order_type: &str,
    status: &str,
    created: &str,
    workorder: &str,
    customer: &str,
    contact: &str,
    workzone: &str,
) -> Vec<String> {
    vec![
        key.to_string(),
        order_type.to_string(),
        status.to_string(),
        created.to_string(),
        workorder.to_string(),
        customer.to_string(),
        contact.to_string(),
        workzone.to_string(),
        format!("SVC-{key}"),
        format!("Jl. {key}"),
        "2024-03-01 10:00:00.0".to_string(),
    ]
}

/// The upload used across the pipeline tests.
///
/// WSA view: AO-100, AO-200 and PDA-300 are new, WSA-600 is already in the
/// reference, AO-400 is a MODIFY and XY-500 matches no category substring.
pub fn sample_rows() -> Vec<Vec<String>> {
    vec![
        report_row("AO-100_A", "CREATE", "WAPPR", "2024-01-15 08:30:00.0", "WO1", "Jane", "0812", "WZ-B"),
        report_row("AO-200_B", "CREATE", "OPEN", "2024-01-16 09:00:00", "WO2", "Jane", "", "WZ-A"),
        report_row("PDA-300_C", "MIGRATE", "WAPPR", "2024-02-01 10:00:00", "WO3", "Bob", "0899", ""),
        report_row("AO-400_D", "MODIFY", "OPEN", "2024-01-20 11:00:00", "WO4", "Ann", "0700", "WZ-A"),
        report_row("XY-500_E", "CREATE", "OPEN", "2024-01-21 12:00:00", "WO5", "Eve", "0711", "WZ-A"),
        report_row("WSA-600_F", "CREATE", "OPEN", "2024-01-22 13:00:00", "WO6", "Tom", "0722", "WZ-A"),
        report_row("AO-700-MO_G", "MODIFY", "OPEN", "2024-01-23 14:00:00", "WO7", "Sue", "0733", "WZ-C"),
    ]
}

pub type Sheet = (String, Vec<Vec<String>>);

pub fn sheet(name: &str, headers: &[&str], rows: &[&[&str]]) -> Sheet {
    let mut all = vec![headers.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    all.extend(rows.iter().map(|r| r.iter().map(|v| v.to_string()).collect()));
    (name.to_string(), all)
}

/// Write every sheet as text cells; the first row of each sheet is its header.
pub fn write_workbook(path: &Path, sheets: &[Sheet]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn write_upload(path: &Path, rows: Vec<Vec<String>>) {
    let mut all = vec![report_headers()];
    all.extend(rows);
    write_workbook(path, &[("Report".to_string(), all)]);
}

/// Reference workbook with one key already known per category.
pub fn write_reference(path: &Path) {
    let c = ColumnMap::default();
    write_workbook(
        path,
        &[
            sheet("WSA", &["No", c.order_key.as_str()], &[&["1", "WSA-600"]]),
            sheet("MODOROSO", &["No", c.order_key.as_str()], &[&["1", "AO-900-DO"]]),
            sheet("WAPPR", &["No", c.work_order_id.as_str()], &[&["1", "WO3"]]),
        ],
    );
}

pub fn write_csv(path: &Path, rows: &[Vec<String>]) {
    let mut text = report_headers().join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}
