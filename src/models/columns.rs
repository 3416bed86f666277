use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{CleanseError, CleanseResult};

/// Logical fields of an order row, independent of the report's header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    OrderKey,
    OrderType,
    Status,
    CreatedAt,
    WorkOrderId,
    CustomerName,
    ContactNumber,
    Workzone,
    ServiceNo,
    Address,
    BookingDate,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::OrderKey,
        Field::OrderType,
        Field::Status,
        Field::CreatedAt,
        Field::WorkOrderId,
        Field::CustomerName,
        Field::ContactNumber,
        Field::Workzone,
        Field::ServiceNo,
        Field::Address,
        Field::BookingDate,
    ];
}

/// Header text for each field in the uploaded report and in the reference sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnMap {
    pub order_key: String,
    pub order_type: String,
    pub status: String,
    pub created_at: String,
    pub work_order_id: String,
    pub customer_name: String,
    pub contact_number: String,
    pub workzone: String,
    pub service_no: String,
    pub address: String,
    pub booking_date: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            order_key: "SC Order No/Track ID/CSRM No".to_string(),
            order_type: "CRM Order Type".to_string(),
            status: "Status".to_string(),
            created_at: "Date Created".to_string(),
            work_order_id: "Workorder".to_string(),
            customer_name: "Customer Name".to_string(),
            contact_number: "Contact Number".to_string(),
            workzone: "Workzone".to_string(),
            service_no: "Service No.".to_string(),
            address: "Address".to_string(),
            booking_date: "Booking Date".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn header(&self, field: Field) -> &str {
        match field {
            Field::OrderKey => &self.order_key,
            Field::OrderType => &self.order_type,
            Field::Status => &self.status,
            Field::CreatedAt => &self.created_at,
            Field::WorkOrderId => &self.work_order_id,
            Field::CustomerName => &self.customer_name,
            Field::ContactNumber => &self.contact_number,
            Field::Workzone => &self.workzone,
            Field::ServiceNo => &self.service_no,
            Field::Address => &self.address,
            Field::BookingDate => &self.booking_date,
        }
    }

    /// Load overrides from a JSON file; keys not present keep the report defaults.
    pub fn load(path: &Path) -> CleanseResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| CleanseError::InvalidConfig {
            field: "columns".to_string(),
            value: format!("{}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let map: ColumnMap = serde_json::from_str(r#"{"workzone": "STO"}"#).unwrap();
        assert_eq!(map.header(Field::Workzone), "STO");
        assert_eq!(map.header(Field::OrderKey), "SC Order No/Track ID/CSRM No");
    }

    #[test]
    fn every_field_has_a_header() {
        let map = ColumnMap::default();
        for field in Field::ALL {
            assert!(!map.header(field).is_empty(), "{field:?}");
        }
    }
}
