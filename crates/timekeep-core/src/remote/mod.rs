//! Minimal contract with the remote system of record.
//!
//! The CLI never talks SQL here: it consumes a narrow select/job-handle
//! shape that any relational backend can implement. Only the slice of the
//! timesheet the cache mirrors (running and paused rows, plus the id
//! column) is ever requested.

pub mod sync;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::RemoteError;

/// Timesheet resource name understood by the remote backend.
pub const TIMESHEET: &str = "timesheet";

/// Canonical ids are at most this many characters.
pub const ID_MAX_LEN: usize = 40;

/// A read request against a remote resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub resource: String,
    pub fields: Vec<String>,
    pub filters: Vec<String>,
    pub order_by: Vec<String>,
}

impl SelectQuery {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            fields: vec!["*".into()],
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// All currently running timesheet rows, oldest first.
    pub fn running_entries() -> Self {
        Self {
            resource: TIMESHEET.into(),
            fields: vec!["*".into()],
            filters: vec!["active IS TRUE".into()],
            order_by: vec!["timestamp_start".into()],
        }
    }

    /// All currently paused timesheet rows, oldest first.
    pub fn paused_entries() -> Self {
        Self {
            resource: TIMESHEET.into(),
            fields: vec!["*".into()],
            filters: vec!["paused IS TRUE".into()],
            order_by: vec!["timestamp_start".into()],
        }
    }

    /// Every known entry id, newest first.
    pub fn entry_ids() -> Self {
        Self {
            resource: TIMESHEET.into(),
            fields: vec!["id".into()],
            filters: Vec::new(),
            order_by: vec!["timestamp_start DESC".into()],
        }
    }
}

/// One timesheet row as returned by the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub id: String,
    pub project: Option<String>,
    pub note: Option<String>,
    pub timestamp_start: Option<DateTime<Utc>>,
    pub timestamp_paused: Option<DateTime<Utc>>,
    pub billable: bool,
    pub paused: bool,
    pub paused_hours: Decimal,
}

impl EntryRow {
    /// Row carrying only an id, as produced by the id-column select.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project: None,
            note: None,
            timestamp_start: None,
            timestamp_paused: None,
            billable: false,
            paused: false,
            paused_hours: Decimal::ZERO,
        }
    }
}

/// Read access to the remote system of record.
pub trait RemoteStore: Send + Sync {
    fn select(&self, query: &SelectQuery) -> Result<Vec<EntryRow>, RemoteError>;
}

/// Handle on an in-flight remote write.
///
/// The sync engine waits on one of these before pulling, so a read issued
/// right after a write never sees stale results.
pub trait RemoteJob {
    fn is_done(&self) -> bool;

    /// Block until the write lands.
    fn wait(&self) -> Result<(), RemoteError>;
}

/// Canonical id for a time entry: hex SHA-256 over project, note and start,
/// truncated to [`ID_MAX_LEN`] characters.
pub fn entry_id(project: &str, note: Option<&str>, start: DateTime<FixedOffset>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project.as_bytes());
    hasher.update([0]);
    hasher.update(note.unwrap_or_default().as_bytes());
    hasher.update([0]);
    hasher.update(start.to_rfc3339().as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_MAX_LEN);
    id
}
