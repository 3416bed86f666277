//! Category rules as data: one row per validation category.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::CleanseError;
use crate::models::Field;
use crate::types::OrderType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// New installs (WSA fulfillment).
    Wsa,
    /// Modify / disconnect orders.
    Modoroso,
    /// Orders waiting for approval.
    Wappr,
}

/// Which field identifies a row when comparing against the reference sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    OrderKeyPrefix,
    WorkOrderId,
}

impl DedupKey {
    pub fn field(self) -> Field {
        match self {
            DedupKey::OrderKeyPrefix => Field::OrderKey,
            DedupKey::WorkOrderId => Field::WorkOrderId,
        }
    }
}

#[derive(Debug)]
pub struct CategoryRules {
    pub category: Category,
    /// Order key must contain at least one of these (case-insensitive).
    pub key_substrings: &'static [&'static str],
    /// Empty means no order-type restriction.
    pub order_types: &'static [OrderType],
    pub required_status: Option<&'static str>,
    pub backfill_contacts: bool,
    pub detect_sub_type: bool,
    pub dedup_key: DedupKey,
    pub reference_worksheet: &'static str,
}

static RULES: [CategoryRules; 3] = [
    CategoryRules {
        category: Category::Wsa,
        key_substrings: &["AO", "PDA", "WSA"],
        order_types: &[OrderType::Create, OrderType::Migrate],
        required_status: None,
        backfill_contacts: true,
        detect_sub_type: false,
        dedup_key: DedupKey::OrderKeyPrefix,
        reference_worksheet: "WSA",
    },
    CategoryRules {
        category: Category::Modoroso,
        key_substrings: &["-MO", "-DO"],
        order_types: &[OrderType::Modify, OrderType::Disconnect],
        required_status: None,
        backfill_contacts: true,
        detect_sub_type: true,
        dedup_key: DedupKey::OrderKeyPrefix,
        reference_worksheet: "MODOROSO",
    },
    CategoryRules {
        category: Category::Wappr,
        key_substrings: &["AO", "PDA", "WSA"],
        order_types: &[],
        required_status: Some("WAPPR"),
        backfill_contacts: false,
        detect_sub_type: false,
        dedup_key: DedupKey::WorkOrderId,
        reference_worksheet: "WAPPR",
    },
];

impl Category {
    pub const ALL: [Category; 3] = [Category::Wsa, Category::Modoroso, Category::Wappr];

    pub fn rules(self) -> &'static CategoryRules {
        match self {
            Category::Wsa => &RULES[0],
            Category::Modoroso => &RULES[1],
            Category::Wappr => &RULES[2],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Wsa => "wsa",
            Category::Modoroso => "modoroso",
            Category::Wappr => "wappr",
        }
    }

    /// Columns the upload must carry for this category.
    pub fn required_fields(self) -> Vec<Field> {
        let mut fields = vec![Field::OrderKey];
        let key_field = self.rules().dedup_key.field();
        if !fields.contains(&key_field) {
            fields.push(key_field);
        }
        fields
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CleanseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| CleanseError::UnknownCategory(s.to_string()))
    }
}

impl CategoryRules {
    /// Case-insensitive alternation over the key substrings.
    pub fn key_matcher(&self) -> Regex {
        let pattern = self
            .key_substrings
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("escaped substrings form a valid pattern")
    }

    pub fn allows_order_type(&self, order_type: Option<OrderType>) -> bool {
        if self.order_types.is_empty() {
            return true;
        }
        order_type.map_or(false, |t| self.order_types.contains(&t))
    }

    pub fn allows_status(&self, status: Option<&str>) -> bool {
        match self.required_status {
            None => true,
            Some(required) => status.map_or(false, |s| s.trim().eq_ignore_ascii_case(required)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_line_up_with_categories() {
        for category in Category::ALL {
            assert_eq!(category.rules().category, category);
        }
    }

    #[test]
    fn parse_category_names() {
        assert_eq!("WSA".parse::<Category>().unwrap(), Category::Wsa);
        assert_eq!(" wappr ".parse::<Category>().unwrap(), Category::Wappr);
        assert!(matches!(
            "fulfillment".parse::<Category>(),
            Err(CleanseError::UnknownCategory(_))
        ));
    }

    #[test]
    fn key_matcher_is_case_insensitive_or() {
        let re = Category::Wsa.rules().key_matcher();
        assert!(re.is_match("AO123_A"));
        assert!(re.is_match("xx-pda-1_b"));
        assert!(re.is_match("1-wsa9"));
        assert!(!re.is_match("XY999_B"));
    }

    #[test]
    fn status_compare_trims_and_ignores_case() {
        let rules = Category::Wappr.rules();
        assert!(rules.allows_status(Some("  wappr ")));
        assert!(!rules.allows_status(Some("COMPLETE")));
        assert!(!rules.allows_status(None));
        assert!(Category::Wsa.rules().allows_status(None));
    }

    #[test]
    fn wappr_requires_work_order_column() {
        assert_eq!(
            Category::Wappr.required_fields(),
            vec![Field::OrderKey, Field::WorkOrderId]
        );
        assert_eq!(Category::Wsa.required_fields(), vec![Field::OrderKey]);
    }
}
