//! Store-and-forward spool inspection library
//!
//! Scans the on-disk transaction buffer of an external forwarder process
//! and aggregates pending and quarantined work into health metrics. The
//! spool is never mutated; every operation recomputes from disk and
//! tolerates concurrent appends, rotations, and deletions by the forwarder.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod inspector;
pub mod publisher;
pub mod reader;
pub mod service;
pub mod snapshot;
pub mod types;

pub use error::InspectError;
pub use snapshot::{Inspector, Snapshot};
