use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::errors::{CleanseError, CleanseResult};
use crate::models::{ColumnMap, Field};

/// Header row plus data rows as text, straight from a workbook or CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the column whose trimmed header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// All values of one column, in row order. Short rows yield "".
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Create,
    Migrate,
    Modify,
    Disconnect,
    Other,
}

impl OrderType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CREATE" => OrderType::Create,
            "MIGRATE" => OrderType::Migrate,
            "MODIFY" => OrderType::Modify,
            "DISCONNECT" => OrderType::Disconnect,
            _ => OrderType::Other,
        }
    }
}

/// Sub-type read from the order key ("-MO" / "-DO").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubType {
    Mo,
    Do,
    Unknown,
}

impl SubType {
    pub fn label(self) -> &'static str {
        match self {
            SubType::Mo => "MO",
            SubType::Do => "DO",
            SubType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRecord {
    pub order_key: String,
    pub order_type: Option<OrderType>,
    pub order_type_raw: Option<String>,
    pub status: Option<String>,
    pub created_raw: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub work_order_id: Option<String>,
    pub customer_name: Option<String>,
    pub contact_number: Option<String>,
    pub workzone: Option<String>,
    pub service_no: Option<String>,
    pub address: Option<String>,
    pub booking_date: Option<String>,
    pub sub_type: Option<SubType>,
}

impl OrderRecord {
    pub fn with_key(order_key: &str) -> Self {
        Self {
            order_key: order_key.to_string(),
            ..Default::default()
        }
    }

    /// Order key up to the first underscore, trimmed.
    pub fn order_prefix(&self) -> &str {
        self.order_key
            .split('_')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Text between the first '-' and the following '_' (e.g. "AO-7781_X" -> "7781").
    pub fn order_detail(&self) -> Option<&str> {
        let (_, rest) = self.order_key.split_once('-')?;
        let detail = rest.split('_').next().unwrap_or_default();
        Some(detail)
    }

    pub fn has_contact(&self) -> bool {
        self.contact_number
            .as_deref()
            .map_or(false, |c| !c.trim().is_empty())
    }
}

/// Records mapped from an upload, plus which columns the upload carried.
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    pub records: Vec<OrderRecord>,
    pub present: HashSet<Field>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl OrderBatch {
    pub fn from_table(table: &RawTable, columns: &ColumnMap) -> Self {
        let indices: Vec<(Field, usize)> = Field::ALL
            .iter()
            .filter_map(|&f| table.column_index(columns.header(f)).map(|i| (f, i)))
            .collect();
        let present = indices.iter().map(|(f, _)| *f).collect();
        let records = (0..table.rows.len())
            .map(|row| {
                let mut record = OrderRecord::default();
                for &(field, col) in &indices {
                    let value = table.cell(row, col);
                    match field {
                        Field::OrderKey => {
                            record.order_key = value.unwrap_or_default().trim().to_string()
                        }
                        Field::OrderType => {
                            record.order_type_raw = non_blank(value);
                            record.order_type =
                                record.order_type_raw.as_deref().map(OrderType::parse);
                        }
                        Field::Status => record.status = non_blank(value),
                        Field::CreatedAt => record.created_raw = non_blank(value),
                        Field::WorkOrderId => record.work_order_id = non_blank(value),
                        Field::CustomerName => record.customer_name = non_blank(value),
                        Field::ContactNumber => record.contact_number = non_blank(value),
                        Field::Workzone => record.workzone = non_blank(value),
                        Field::ServiceNo => record.service_no = non_blank(value),
                        Field::Address => record.address = non_blank(value),
                        Field::BookingDate => record.booking_date = non_blank(value),
                    }
                }
                record
            })
            .collect();
        Self { records, present }
    }

    pub fn has(&self, field: Field) -> bool {
        self.present.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Months (1-12) to keep; empty keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthFilter(BTreeSet<u32>);

impl MonthFilter {
    pub fn new<I: IntoIterator<Item = u32>>(months: I) -> CleanseResult<Self> {
        let mut set = BTreeSet::new();
        for m in months {
            if !(1..=12).contains(&m) {
                return Err(CleanseError::InvalidMonth(m));
            }
            set.insert(m);
        }
        Ok(Self(set))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, month: u32) -> bool {
        self.0.contains(&month)
    }

    pub fn months(&self) -> Vec<u32> {
        self.0.iter().copied().collect()
    }
}
