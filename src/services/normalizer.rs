//! Record normalizer and deduplicator.
//!
//! One pass over an uploaded batch: category filter, secondary filter, contact
//! backfill, timestamp parsing, month filter, key normalization, dedup against
//! the reference snapshot, then a stable workzone sort.

use chrono::Datelike;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::errors::{CleanseError, CleanseResult, DataWarning};
use crate::models::{Category, ColumnMap, DedupKey, Field};
use crate::reference::ReferenceKeySet;
use crate::services::keys::{detect_sub_type, normalize_key, parse_timestamp};
use crate::types::{MonthFilter, OrderBatch, OrderRecord};

#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<OrderRecord>,
    /// Rows that reached the dedup step.
    pub filtered_count: usize,
    pub final_count: usize,
    pub warnings: Vec<DataWarning>,
}

/// Dedup key of a record for the given rule, already normalized.
pub fn dedup_key(record: &OrderRecord, key: DedupKey) -> Option<String> {
    let raw = match key {
        DedupKey::OrderKeyPrefix => record.order_prefix(),
        DedupKey::WorkOrderId => record.work_order_id.as_deref()?,
    };
    let normalized = normalize_key(raw);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Fails with `MissingColumn` when the upload lacks a column the category cannot run without.
pub fn check_required_columns(
    batch: &OrderBatch,
    category: Category,
    columns: &ColumnMap,
) -> CleanseResult<()> {
    match category.required_fields().into_iter().find(|f| !batch.has(*f)) {
        Some(field) => Err(CleanseError::MissingColumn {
            column: columns.header(field).to_string(),
            category: category.to_string(),
        }),
        None => Ok(()),
    }
}

/// Fill blank contact numbers from the first non-blank number seen for the same customer.
pub fn backfill_contacts(records: &mut [OrderRecord]) -> usize {
    let mut by_name: HashMap<String, String> = HashMap::new();
    for r in records.iter() {
        if let (Some(name), Some(contact)) = (&r.customer_name, &r.contact_number) {
            if !contact.trim().is_empty() {
                by_name
                    .entry(name.clone())
                    .or_insert_with(|| contact.clone());
            }
        }
    }
    let mut filled = 0;
    for r in records.iter_mut().filter(|r| !r.has_contact()) {
        if let Some(contact) = r.customer_name.as_ref().and_then(|n| by_name.get(n)) {
            r.contact_number = Some(contact.clone());
            filled += 1;
        }
    }
    filled
}

/// Stable sort by workzone, blank or missing workzones last.
pub fn sort_by_workzone(records: &mut [OrderRecord]) {
    records.sort_by(|a, b| {
        let a = a.workzone.as_deref().filter(|w| !w.trim().is_empty());
        let b = b.workzone.as_deref().filter(|w| !w.trim().is_empty());
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

pub fn normalize(
    batch: &OrderBatch,
    category: Category,
    months: &MonthFilter,
    reference: &ReferenceKeySet,
    columns: &ColumnMap,
) -> CleanseResult<NormalizeOutcome> {
    check_required_columns(batch, category, columns)?;
    let rules = category.rules();
    let mut warnings = Vec::new();

    let matcher = rules.key_matcher();
    let mut rows: Vec<OrderRecord> = batch
        .records
        .iter()
        .filter(|r| matcher.is_match(&r.order_key))
        .cloned()
        .collect();
    debug!(category = %category, kept = rows.len(), total = batch.len(), "category filter");

    if !rules.order_types.is_empty() {
        if batch.has(Field::OrderType) {
            rows.retain(|r| rules.allows_order_type(r.order_type));
            debug!(kept = rows.len(), "order type filter");
        } else {
            warnings.push(DataWarning::FilterColumnAbsent {
                column: columns.header(Field::OrderType).to_string(),
            });
        }
    }
    if rules.required_status.is_some() {
        if batch.has(Field::Status) {
            rows.retain(|r| rules.allows_status(r.status.as_deref()));
            debug!(kept = rows.len(), "status filter");
        } else {
            warnings.push(DataWarning::FilterColumnAbsent {
                column: columns.header(Field::Status).to_string(),
            });
        }
    }

    if rules.backfill_contacts && batch.has(Field::CustomerName) && batch.has(Field::ContactNumber) {
        let filled = backfill_contacts(&mut rows);
        debug!(filled, "contact backfill");
    }

    if rules.detect_sub_type {
        for r in rows.iter_mut() {
            r.sub_type = Some(detect_sub_type(&r.order_key));
        }
    }

    let mut unparsable = 0;
    for r in rows.iter_mut() {
        r.created_at = r.created_raw.as_deref().and_then(parse_timestamp);
        if r.created_raw.is_some() && r.created_at.is_none() {
            unparsable += 1;
        }
    }
    if unparsable > 0 {
        warnings.push(DataWarning::UnparsableTimestamps { count: unparsable });
    }

    if !months.is_empty() {
        if batch.has(Field::CreatedAt) {
            let before = rows.len();
            rows.retain(|r| r.created_at.map_or(false, |ts| months.contains(ts.month())));
            debug!(kept = rows.len(), months = ?months.months(), "month filter");
            if before > 0 && rows.is_empty() {
                warnings.push(DataWarning::MonthFilterEmptied {
                    months: months.months(),
                    dropped: before,
                });
            }
        } else {
            warnings.push(DataWarning::MonthFilterSkipped);
        }
    }

    for r in rows.iter_mut() {
        r.work_order_id = r
            .work_order_id
            .as_deref()
            .map(normalize_key)
            .filter(|w| !w.is_empty());
    }

    let filtered_count = rows.len();
    rows.retain(|r| match dedup_key(r, rules.dedup_key) {
        Some(key) => !reference.contains(&key),
        None => true,
    });
    debug!(
        filtered = filtered_count,
        new = rows.len(),
        reference = reference.len(),
        "dedup against reference"
    );

    sort_by_workzone(&mut rows);

    for w in &warnings {
        warn!(category = %category, "{}", w);
    }

    Ok(NormalizeOutcome {
        final_count: rows.len(),
        filtered_count,
        records: rows,
        warnings,
    })
}
