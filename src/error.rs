//! Inspection error types
//!
//! Only conditions that must fail a poll cycle are errors. A missing spool
//! directory, a missing checkpoint file, and a file vanishing mid-scan are
//! normal states of a live spool and are handled as zero contributions by
//! the components that encounter them.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal inspection errors
#[derive(Debug, Error)]
pub enum InspectError {
    /// The checkpoint file exists but does not hold a parseable timestamp.
    /// The checkpoint is load-bearing: defaulting it would misreport the
    /// backlog, so the whole cycle fails instead.
    #[error("corrupt checkpoint {}: {source}", .path.display())]
    CorruptCheckpoint {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A transaction log line is not valid JSON or lacks required fields
    #[error("corrupt record at {}:{line}: {source}", .path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Unexpected I/O failure. Missing files are not routed here; they are
    /// the vanished-file race and contribute zero.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
