//! Core data types for spool inspection

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One line of an append-only transaction log.
///
/// Buffer files carry additional fields (request payload, retry metadata);
/// the inspector only needs the enqueue time and the transaction kind, so
/// everything else is ignored on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    /// Enqueue time. The offset is preserved so records written from hosts
    /// in different timezones still order correctly against the checkpoint.
    pub timestamp: DateTime<FixedOffset>,

    /// Transaction kind tag, e.g. "ResultCreateRequest"
    #[serde(rename = "type")]
    pub kind: String,
}

/// A named group of transaction kinds reported as one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub types: Vec<String>,
}

/// Ordered table mapping transaction kinds to reported categories.
///
/// This is configuration, not data: the default table matches what the
/// forwarder actually writes, and deployments can extend it without
/// touching any aggregation logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Map with no categories; useful when only totals are wanted.
    pub fn empty() -> Self {
        Self { categories: Vec::new() }
    }

    /// Category a transaction kind folds into, first match wins.
    pub fn category_for(&self, kind: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.name.as_str())
    }

    /// Fresh all-zero counts, one entry per category.
    ///
    /// Publishers expect a stable name set every cycle, so aggregation
    /// starts from this instead of inserting names lazily.
    pub fn zeroed_counts(&self) -> BTreeMap<String, u64> {
        self.categories.iter().map(|c| (c.name.clone(), 0)).collect()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new(vec![
            Category {
                name: "results".to_string(),
                types: vec![
                    "ResultCreateRequest".to_string(),
                    "ResultUpdateRequest".to_string(),
                ],
            },
            Category {
                name: "steps".to_string(),
                types: vec![
                    "StepCreateRequest".to_string(),
                    "StepUpdateRequest".to_string(),
                ],
            },
        ])
    }
}

/// File count and size totals for the active and quarantine buffer sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    pub pending_files: u64,
    pub pending_kib: u64,
    pub quarantine_files: u64,
    pub quarantine_kib: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_covers_reference_transaction_kinds() {
        let map = CategoryMap::default();
        assert_eq!(map.category_for("ResultCreateRequest"), Some("results"));
        assert_eq!(map.category_for("ResultUpdateRequest"), Some("results"));
        assert_eq!(map.category_for("StepCreateRequest"), Some("steps"));
        assert_eq!(map.category_for("StepUpdateRequest"), Some("steps"));
        assert_eq!(map.category_for("TelemetryPing"), None);
    }

    #[test]
    fn zeroed_counts_lists_every_category() {
        let counts = CategoryMap::default().zeroed_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["results"], 0);
        assert_eq!(counts["steps"], 0);
    }

    #[test]
    fn first_matching_category_wins() {
        let map = CategoryMap::new(vec![
            Category {
                name: "a".to_string(),
                types: vec!["Shared".to_string()],
            },
            Category {
                name: "b".to_string(),
                types: vec!["Shared".to_string()],
            },
        ]);
        assert_eq!(map.category_for("Shared"), Some("a"));
    }

    #[test]
    fn record_deserialization_ignores_extra_fields() {
        let line = r#"{"timestamp":"2026-08-23T10:15:00+02:00","type":"ResultCreateRequest","payload":{"id":42},"attempts":3}"#;
        let record: TransactionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.kind, "ResultCreateRequest");
        assert_eq!(record.timestamp.offset().local_minus_utc(), 2 * 3600);
    }
}
