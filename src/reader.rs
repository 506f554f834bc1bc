//! Transaction log reader
//!
//! One `.jsonl` buffer file is one JSON object per line, appended by the
//! forwarder while we read. Reading up to the EOF observed during the scan
//! is sufficient; lines appended afterwards belong to the next cycle.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use crate::error::InspectError;
use crate::types::TransactionRecord;

/// Lazy, finite, non-restartable reader over one transaction log.
///
/// A malformed line is surfaced as [`InspectError::CorruptRecord`]; there
/// is no per-line skip, matching the forwarder's append-only contract that
/// committed lines are always complete JSON.
pub struct TransactionLog {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl TransactionLog {
    /// Open a buffer file for reading.
    ///
    /// `Ok(None)` means the file vanished between directory listing and
    /// open (the forwarder rotated it away); callers treat that as zero
    /// contribution rather than an error.
    pub fn open(path: &Path) -> Result<Option<Self>, InspectError> {
        match File::open(path) {
            Ok(file) => Ok(Some(Self {
                path: path.to_path_buf(),
                lines: BufReader::new(file).lines(),
                line_no: 0,
            })),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(InspectError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for TransactionLog {
    type Item = Result<TransactionRecord, InspectError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(source) => {
                return Some(Err(InspectError::Io {
                    path: self.path.clone(),
                    source,
                }))
            }
        };
        self.line_no += 1;
        Some(
            serde_json::from_str(&line).map_err(|source| InspectError::CorruptRecord {
                path: self.path.clone(),
                line: self.line_no,
                source,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn reads_records_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            dir.path(),
            "buffer.jsonl",
            &[
                r#"{"timestamp":"2026-08-23T10:00:00+00:00","type":"ResultCreateRequest"}"#,
                r#"{"timestamp":"2026-08-23T10:00:01+00:00","type":"StepUpdateRequest"}"#,
            ],
        );
        let records: Vec<_> = TransactionLog::open(&path)
            .unwrap()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "ResultCreateRequest");
        assert_eq!(records[1].kind, "StepUpdateRequest");
    }

    #[test]
    fn vanished_file_opens_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("rotated-away.jsonl");
        assert!(TransactionLog::open(&gone).unwrap().is_none());
    }

    #[test]
    fn malformed_line_reports_path_and_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            dir.path(),
            "buffer.jsonl",
            &[
                r#"{"timestamp":"2026-08-23T10:00:00+00:00","type":"ResultCreateRequest"}"#,
                "{truncated",
            ],
        );
        let mut log = TransactionLog::open(&path).unwrap().unwrap();
        assert!(log.next().unwrap().is_ok());
        match log.next().unwrap().unwrap_err() {
            InspectError::CorruptRecord { line, path: p, .. } => {
                assert_eq!(line, 2);
                assert_eq!(p, path);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn record_missing_type_field_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_log(
            dir.path(),
            "buffer.jsonl",
            &[r#"{"timestamp":"2026-08-23T10:00:00+00:00"}"#],
        );
        let mut log = TransactionLog::open(&path).unwrap().unwrap();
        assert!(matches!(
            log.next().unwrap().unwrap_err(),
            InspectError::CorruptRecord { line: 1, .. }
        ));
    }
}
