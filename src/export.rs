//! Column layout of the result sheet, shared by the xlsx and CSV writers.

use crate::models::{ColumnMap, Field};
use crate::services::keys::strip_fraction;
use crate::types::OrderRecord;

pub const DATE_OUTPUT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub const ORDER_DETAIL_HEADER: &str = "Order Detail";
pub const SUB_TYPE_HEADER: &str = "Sub-Type";

/// Output column, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Input(Field),
    OrderDetail,
    SubType,
}

pub const EXPORT_COLUMNS: &[ExportColumn] = &[
    ExportColumn::Input(Field::Workzone),
    ExportColumn::Input(Field::CreatedAt),
    ExportColumn::Input(Field::OrderKey),
    ExportColumn::OrderDetail,
    ExportColumn::Input(Field::ServiceNo),
    ExportColumn::Input(Field::WorkOrderId),
    ExportColumn::Input(Field::CustomerName),
    ExportColumn::Input(Field::Address),
    ExportColumn::Input(Field::ContactNumber),
    ExportColumn::Input(Field::OrderType),
    ExportColumn::Input(Field::Status),
    ExportColumn::SubType,
    ExportColumn::Input(Field::BookingDate),
];

/// Headers reuse the report's own names so rows can be pasted into the reference sheet.
pub fn export_headers(columns: &ColumnMap) -> Vec<String> {
    EXPORT_COLUMNS
        .iter()
        .map(|c| match c {
            ExportColumn::Input(field) => columns.header(*field).to_string(),
            ExportColumn::OrderDetail => ORDER_DETAIL_HEADER.to_string(),
            ExportColumn::SubType => SUB_TYPE_HEADER.to_string(),
        })
        .collect()
}

fn created_text(record: &OrderRecord) -> String {
    match record.created_at {
        Some(ts) => ts.format(DATE_OUTPUT_FORMAT).to_string(),
        None => record.created_raw.clone().unwrap_or_default(),
    }
}

pub fn export_cell(record: &OrderRecord, column: ExportColumn) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    match column {
        ExportColumn::Input(field) => match field {
            Field::Workzone => opt(&record.workzone),
            Field::CreatedAt => created_text(record),
            Field::OrderKey => record.order_prefix().to_string(),
            Field::ServiceNo => opt(&record.service_no),
            Field::WorkOrderId => opt(&record.work_order_id),
            Field::CustomerName => opt(&record.customer_name),
            Field::Address => opt(&record.address),
            Field::ContactNumber => opt(&record.contact_number),
            Field::OrderType => opt(&record.order_type_raw),
            Field::Status => opt(&record.status),
            Field::BookingDate => record
                .booking_date
                .as_deref()
                .map(|b| strip_fraction(b).to_string())
                .unwrap_or_default(),
        },
        ExportColumn::OrderDetail => record.order_detail().unwrap_or_default().to_string(),
        ExportColumn::SubType => record
            .sub_type
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
    }
}

pub fn export_row(record: &OrderRecord) -> Vec<String> {
    EXPORT_COLUMNS
        .iter()
        .map(|c| export_cell(record, *c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::keys::parse_timestamp;

    #[test]
    fn row_matches_header_count() {
        let headers = export_headers(&ColumnMap::default());
        let row = export_row(&OrderRecord::with_key("AO1_A"));
        assert_eq!(headers.len(), row.len());
        assert_eq!(headers[0], "Workzone");
        assert_eq!(headers[3], ORDER_DETAIL_HEADER);
    }

    #[test]
    fn formats_dates_and_prefix() {
        let mut r = OrderRecord::with_key("AO-77_A");
        r.created_at = parse_timestamp("2024-01-05 10:11:12.0");
        r.booking_date = Some("2024-01-07 08:00:00.0".into());
        let row = export_row(&r);
        assert_eq!(row[1], "05/01/2024 10:11:12");
        assert_eq!(row[2], "AO-77");
        assert_eq!(row[3], "77");
        assert_eq!(row[12], "2024-01-07 08:00:00");
    }

    #[test]
    fn unparsed_date_is_kept_as_text() {
        let mut r = OrderRecord::with_key("AO1_A");
        r.created_raw = Some("unknown".into());
        assert_eq!(export_row(&r)[1], "unknown");
    }
}
