//! Spool inspection
//!
//! Aggregation over the buffer files of a live spool directory. The spool
//! is owned by the forwarder process, which appends to logs, rotates fully
//! processed files away, and moves failed transactions into `quarantine/`
//! while we scan. Nothing here takes locks or mutates the spool; every
//! operation recomputes from disk and tolerates files disappearing between
//! listing and open.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};

use crate::checkpoint::read_checkpoint;
use crate::error::InspectError;
use crate::reader::TransactionLog;
use crate::types::{BufferStats, CategoryMap};

/// Subdirectory holding transactions the forwarder has given up retrying
pub const QUARANTINE_DIR: &str = "quarantine";

/// Extension of transaction log buffer files
const LOG_EXTENSION: &str = "jsonl";

/// Extension of pending-upload artifact files
const ARTIFACT_EXTENSION: &str = "file";

/// Count pending records per category in the active spool.
///
/// Reads the checkpoint itself; see [`aggregate_pending`] for the variant
/// used by the snapshot builder, which reads the checkpoint once per cycle.
pub fn pending_counts(
    spool_dir: &Path,
    categories: &CategoryMap,
) -> Result<BTreeMap<String, u64>, InspectError> {
    let checkpoint = read_checkpoint(spool_dir)?;
    aggregate_pending(spool_dir, checkpoint, categories)
}

/// Count records with `timestamp >= checkpoint` per category across every
/// `*.jsonl` file directly in the spool directory.
///
/// No checkpoint means an uninitialized spool: there is no confirmed
/// backlog to report, so every category is zero and no logs are scanned.
/// Kinds outside every category are ignored. Files contribute commutatively,
/// so listing order is irrelevant; any read or parse failure aborts the
/// whole aggregation.
pub fn aggregate_pending(
    spool_dir: &Path,
    checkpoint: Option<DateTime<FixedOffset>>,
    categories: &CategoryMap,
) -> Result<BTreeMap<String, u64>, InspectError> {
    let mut counts = categories.zeroed_counts();
    let Some(checkpoint) = checkpoint else {
        return Ok(counts);
    };
    for path in list_buffer_files(spool_dir, LOG_EXTENSION)? {
        for (kind, n) in count_records_since(&path, checkpoint)? {
            if let Some(category) = categories.category_for(&kind) {
                if let Some(slot) = counts.get_mut(category) {
                    *slot += n;
                }
            }
        }
    }
    Ok(counts)
}

/// Total and per-category record counts under `quarantine/`.
///
/// Quarantined transactions are unresolved by definition, so no checkpoint
/// applies; future-dated records count too. A missing quarantine directory
/// is normal and yields zeroes.
pub fn quarantine_counts(
    spool_dir: &Path,
    categories: &CategoryMap,
) -> Result<(u64, BTreeMap<String, u64>), InspectError> {
    let mut total = 0u64;
    let mut counts = categories.zeroed_counts();
    let quarantine_dir = spool_dir.join(QUARANTINE_DIR);
    for path in list_buffer_files(&quarantine_dir, LOG_EXTENSION)? {
        let Some(log) = TransactionLog::open(&path)? else {
            continue;
        };
        for record in log {
            let record = record?;
            total += 1;
            if let Some(category) = categories.category_for(&record.kind) {
                if let Some(slot) = counts.get_mut(category) {
                    *slot += 1;
                }
            }
        }
    }
    Ok((total, counts))
}

/// Total number of quarantined records
pub fn quarantine_count(spool_dir: &Path) -> Result<u64, InspectError> {
    Ok(quarantine_counts(spool_dir, &CategoryMap::empty())?.0)
}

/// Number of pending-upload artifacts (`*.file`) in the active spool
pub fn pending_file_count(spool_dir: &Path) -> Result<u64, InspectError> {
    Ok(list_buffer_files(spool_dir, ARTIFACT_EXTENSION)?.len() as u64)
}

/// File count and size totals for the active and quarantine `*.jsonl` sets
pub fn buffer_stats(spool_dir: &Path) -> Result<BufferStats, InspectError> {
    let pending = list_buffer_files(spool_dir, LOG_EXTENSION)?;
    let quarantine = list_buffer_files(&spool_dir.join(QUARANTINE_DIR), LOG_EXTENSION)?;
    let (pending_files, pending_kib) = size_stats(&pending);
    let (quarantine_files, quarantine_kib) = size_stats(&quarantine);
    Ok(BufferStats {
        pending_files,
        pending_kib,
        quarantine_files,
        quarantine_kib,
    })
}

/// File count and whole-KiB size total for a file set.
///
/// The size is the ceiling of the summed byte total, so any non-empty set
/// reports at least 1 KiB. Files that vanish between listing and stat are
/// skipped from both the count and the size.
pub fn size_stats(files: &[PathBuf]) -> (u64, u64) {
    let mut count = 0u64;
    let mut total_bytes = 0u64;
    for path in files {
        if let Ok(meta) = fs::metadata(path) {
            count += 1;
            total_bytes += meta.len();
        }
    }
    (count, total_bytes.div_ceil(1024))
}

/// Per-kind counts of records at or after the checkpoint in one log file.
/// The boundary is inclusive: a record exactly at the checkpoint is pending.
fn count_records_since(
    path: &Path,
    checkpoint: DateTime<FixedOffset>,
) -> Result<BTreeMap<String, u64>, InspectError> {
    let mut counts = BTreeMap::new();
    let Some(log) = TransactionLog::open(path)? else {
        // Rotated away mid-scan
        return Ok(counts);
    };
    for record in log {
        let record = record?;
        if record.timestamp >= checkpoint {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Non-recursive listing of files in `dir` with the given extension.
/// An absent directory lists as empty.
fn list_buffer_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, InspectError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(InspectError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| InspectError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == extension) && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
