//! Per-poll snapshot assembly

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::checkpoint::read_checkpoint;
use crate::error::InspectError;
use crate::inspector;
use crate::publisher::MetricValue;
use crate::types::{BufferStats, CategoryMap};

/// Context object for one spool, constructed once by the hosting shell and
/// threaded through every poll call. Holds no cross-call mutable state;
/// every scan recomputes from disk.
pub struct Inspector {
    spool_dir: PathBuf,
    categories: CategoryMap,
}

/// Self-consistent aggregate of one inspection cycle
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Pending record counts per category, zero-filled for a stable name set
    pub pending: BTreeMap<String, u64>,
    /// Total quarantined records
    pub quarantine_total: u64,
    /// Quarantined record counts per category
    pub quarantine: BTreeMap<String, u64>,
    /// Pending-upload artifacts (`*.file`) awaiting delivery
    pub pending_artifacts: u64,
    /// File count and size totals for both buffer sets
    pub buffer: BufferStats,
    pub scanned_at: DateTime<Utc>,
}

impl Inspector {
    pub fn new(spool_dir: impl Into<PathBuf>, categories: CategoryMap) -> Self {
        Self {
            spool_dir: spool_dir.into(),
            categories,
        }
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Run one inspection cycle.
    ///
    /// All-or-nothing: the checkpoint is read once, then pending,
    /// quarantine, and size aggregation each re-scan the relevant files.
    /// Any fatal sub-error fails the whole cycle and no snapshot is
    /// produced; the next scheduled poll is the retry.
    pub fn scan(&self) -> Result<Snapshot, InspectError> {
        let checkpoint = read_checkpoint(&self.spool_dir)?;
        let pending = inspector::aggregate_pending(&self.spool_dir, checkpoint, &self.categories)?;
        let (quarantine_total, quarantine) =
            inspector::quarantine_counts(&self.spool_dir, &self.categories)?;
        let pending_artifacts = inspector::pending_file_count(&self.spool_dir)?;
        let buffer = inspector::buffer_stats(&self.spool_dir)?;
        Ok(Snapshot {
            pending,
            quarantine_total,
            quarantine,
            pending_artifacts,
            buffer,
            scanned_at: Utc::now(),
        })
    }
}

impl Snapshot {
    /// Flat name/value pairs in the shape the publisher consumes
    pub fn values(&self) -> Vec<(String, MetricValue)> {
        let mut values = Vec::new();
        for (category, count) in &self.pending {
            values.push((format!("pending.{category}"), MetricValue::Count(*count)));
        }
        values.push((
            "quarantine".to_string(),
            MetricValue::Count(self.quarantine_total),
        ));
        for (category, count) in &self.quarantine {
            values.push((
                format!("quarantine.{category}"),
                MetricValue::Count(*count),
            ));
        }
        values.push((
            "pending.uploads".to_string(),
            MetricValue::Count(self.pending_artifacts),
        ));
        values.push((
            "buffer.pending.files".to_string(),
            MetricValue::Count(self.buffer.pending_files),
        ));
        values.push((
            "buffer.pending.kib".to_string(),
            MetricValue::Count(self.buffer.pending_kib),
        ));
        values.push((
            "buffer.quarantine.files".to_string(),
            MetricValue::Count(self.buffer.quarantine_files),
        ));
        values.push((
            "buffer.quarantine.kib".to_string(),
            MetricValue::Count(self.buffer.quarantine_kib),
        ));
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_of_empty_directory_is_all_zero() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = Inspector::new(dir.path(), CategoryMap::default());
        let snapshot = inspector.scan().unwrap();
        assert!(snapshot.pending.values().all(|&v| v == 0));
        assert_eq!(snapshot.quarantine_total, 0);
        assert_eq!(snapshot.pending_artifacts, 0);
        assert_eq!(snapshot.buffer, BufferStats::default());
    }

    #[test]
    fn values_emit_a_stable_name_set() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = Inspector::new(dir.path(), CategoryMap::default());
        let values = inspector.scan().unwrap().values();
        let names: Vec<_> = values.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "pending.results",
                "pending.steps",
                "quarantine",
                "quarantine.results",
                "quarantine.steps",
                "pending.uploads",
                "buffer.pending.files",
                "buffer.pending.kib",
                "buffer.quarantine.files",
                "buffer.quarantine.kib",
            ]
        );
    }
}
