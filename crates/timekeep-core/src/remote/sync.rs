//! Reconciliation of the local cache with the remote system of record.
//!
//! Sync is last-writer-wins replacement, never a merge: the remote row sets
//! are pulled, re-derived into cache entries and swapped in wholesale inside
//! a single transaction. Local-only state not yet reflected remotely is
//! discarded by design.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::FixedOffset;

use crate::cache::{EntryCache, TimeEntry};
use crate::duration::HOUR_PRECISION;
use crate::error::Result;
use crate::remote::{EntryRow, RemoteJob, RemoteStore, SelectQuery};

/// Pulls the remote running/paused row sets into the cache.
pub struct SyncEngine {
    remote: Arc<dyn RemoteStore>,
}

impl SyncEngine {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Replace the cache contents with the remote store's current state.
    ///
    /// When `pending` holds an unfinished remote write, it is waited on
    /// first so the pull cannot read stale results. The previously active
    /// entry keeps position 0 if it is still running remotely; an empty
    /// remote running set falls back to the default sentinel stack.
    pub fn sync(&self, cache: &EntryCache, pending: Option<&dyn RemoteJob>) -> Result<()> {
        if let Some(job) = pending {
            if !job.is_done() {
                job.wait()?;
            }
        }

        let running_rows = self.remote.select(&SelectQuery::running_entries())?;
        let paused_rows = self.remote.select(&SelectQuery::paused_entries())?;

        let tz = cache.timezone();
        let active_id = cache.active_id();

        let mut running: Vec<TimeEntry> = Vec::with_capacity(running_rows.len());
        for row in &running_rows {
            let entry = entry_from_row(row, tz);
            if Some(&row.id) == active_id.as_ref() {
                running.insert(0, entry);
            } else {
                running.push(entry);
            }
        }
        if running.is_empty() {
            running.push(TimeEntry::sentinel());
        }

        let running_ids: HashSet<&str> = running_rows.iter().map(|r| r.id.as_str()).collect();
        let paused: Vec<TimeEntry> = paused_rows
            .iter()
            .filter(|row| !running_ids.contains(row.id.as_str()))
            .map(|row| paused_entry_from_row(row, tz))
            .collect();

        cache.replace_all(running, paused)?;
        tracing::debug!(
            running = running_rows.len(),
            paused = paused_rows.len(),
            "cache sync complete"
        );
        Ok(())
    }
}

fn entry_from_row(row: &EntryRow, tz: FixedOffset) -> TimeEntry {
    TimeEntry {
        project: row.project.clone(),
        id: Some(row.id.clone()),
        start: row.timestamp_start.map(|t| t.with_timezone(&tz)),
        note: row.note.clone(),
        is_billable: Some(row.billable),
        is_paused: Some(row.paused),
        time_paused: None,
        paused_hrs: row.paused_hours.round_dp(HOUR_PRECISION),
    }
}

fn paused_entry_from_row(row: &EntryRow, tz: FixedOffset) -> TimeEntry {
    TimeEntry {
        time_paused: row.timestamp_paused.map(|t| t.with_timezone(&tz)),
        ..entry_from_row(row, tz)
    }
}
