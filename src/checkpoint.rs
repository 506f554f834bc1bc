//! Checkpoint store
//!
//! The forwarder maintains a single well-known file in the active spool
//! directory recording the enqueue timestamp of the last transaction it has
//! confirmed delivered, across all buffer files. Everything at or after
//! that instant is still pending.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::InspectError;

/// Well-known checkpoint file name inside the active spool directory
pub const CHECKPOINT_FILE: &str = "__CACHE__";

#[derive(Debug, Deserialize)]
struct CheckpointFile {
    timestamp: DateTime<FixedOffset>,
}

/// Read the last-processed timestamp from `<spool>/__CACHE__`.
///
/// A missing spool directory and a missing checkpoint file both mean the
/// forwarder has no confirmed backlog yet and return `Ok(None)`. A
/// checkpoint that exists but does not parse is never substituted with a
/// default; it fails the cycle.
pub fn read_checkpoint(
    spool_dir: &Path,
) -> Result<Option<DateTime<FixedOffset>>, InspectError> {
    let path = spool_dir.join(CHECKPOINT_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(InspectError::Io { path, source }),
    };
    let parsed: CheckpointFile = serde_json::from_str(&raw)
        .map_err(|source| InspectError::CorruptCheckpoint { path, source })?;
    Ok(Some(parsed.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_directory_means_no_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-spool");
        assert!(read_checkpoint(&missing).unwrap().is_none());
    }

    #[test]
    fn absent_file_means_no_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_checkpoint(dir.path()).unwrap().is_none());
    }

    #[test]
    fn checkpoint_parses_with_offset_preserved() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CHECKPOINT_FILE),
            r#"{"timestamp": "2026-08-23T09:30:00-05:00"}"#,
        )
        .unwrap();
        let checkpoint = read_checkpoint(dir.path()).unwrap().unwrap();
        assert_eq!(checkpoint.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(
            checkpoint,
            DateTime::parse_from_rfc3339("2026-08-23T14:30:00+00:00").unwrap()
        );
    }

    #[test]
    fn corrupt_checkpoint_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CHECKPOINT_FILE), "not json").unwrap();
        let err = read_checkpoint(dir.path()).unwrap_err();
        assert!(matches!(err, InspectError::CorruptCheckpoint { .. }));
    }

    #[test]
    fn checkpoint_without_timestamp_field_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CHECKPOINT_FILE), r#"{"cursor": 7}"#).unwrap();
        let err = read_checkpoint(dir.path()).unwrap_err();
        assert!(matches!(err, InspectError::CorruptCheckpoint { .. }));
    }
}
