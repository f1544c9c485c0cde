//! The local time-entry cache.
//!
//! [`CacheDocument`] is the in-memory state: a running stack whose position 0
//! is the active entry (possibly the sentinel) and an unordered paused set.
//! [`EntryCache`] wraps it with the transactional update protocol:
//!
//! file lock -> writer lock -> reload from disk -> mutate a working copy ->
//! serialize the whole document and atomically replace the file -> reload ->
//! release both locks in reverse order.
//!
//! A failed mutation persists nothing; both locks are released by RAII on
//! every exit path. Reads take the in-process reader lock only and return
//! snapshots.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::{CacheFile, TimeEntry};
use super::lock::FileLock;
use crate::duration;
use crate::error::{CacheError, CoreError};
use crate::storage::{self, Config};

/// Which collection an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryList {
    Running,
    Paused,
}

impl EntryList {
    fn name(self) -> &'static str {
        match self {
            EntryList::Running => "running",
            EntryList::Paused => "paused",
        }
    }
}

/// In-memory cache state.
///
/// Invariant: `running` always holds at least one element; index 0 is the
/// active entry and may be the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheDocument {
    running: Vec<TimeEntry>,
    paused: Vec<TimeEntry>,
}

impl Default for CacheDocument {
    fn default() -> Self {
        Self {
            running: vec![TimeEntry::sentinel()],
            paused: Vec::new(),
        }
    }
}

impl CacheDocument {
    pub(crate) fn from_file(file: CacheFile) -> Self {
        let mut doc = Self {
            running: file.running.entries,
            paused: file.paused.entries,
        };
        doc.restore_invariant();
        doc
    }

    pub(crate) fn to_file(&self) -> CacheFile {
        CacheFile::from_document(self.running.clone(), self.paused.clone())
    }

    fn restore_invariant(&mut self) {
        if self.running.is_empty() {
            self.running.push(TimeEntry::sentinel());
        }
    }

    pub fn running(&self) -> &[TimeEntry] {
        &self.running
    }

    pub fn paused(&self) -> &[TimeEntry] {
        &self.paused
    }

    /// The entry at running position 0.
    pub fn active(&self) -> &TimeEntry {
        &self.running[0]
    }

    /// Mutable access to the active slot, for the caller filling in a new
    /// entry after [`CacheDocument::start_new_active`].
    pub fn active_mut(&mut self) -> &mut TimeEntry {
        &mut self.running[0]
    }

    /// True iff a timer is being tracked right now.
    pub fn is_active(&self) -> bool {
        !self.active().is_sentinel()
    }

    /// Push a fresh sentinel at position 0, displacing the previous active
    /// entry (if any) to position 1. The caller fills the slot immediately.
    pub fn start_new_active(&mut self) {
        self.running.insert(0, TimeEntry::sentinel());
    }

    /// Rotate the running entry with `id` to position 0, preserving the
    /// relative order of the rest.
    pub fn switch_active(&mut self, id: &str) -> Result<(), CacheError> {
        let idx = self
            .running
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| CacheError::Consistency {
                id: id.to_string(),
                list: EntryList::Running.name(),
            })?;
        let entry = self.running.remove(idx);
        self.running.insert(0, entry);
        Ok(())
    }

    /// Flag the active entry as paused at `at` and move it into the paused
    /// set, leaving a valid position 0 behind (sentinel if nothing else
    /// runs). Returns the paused entry's id.
    pub fn pause_active(&mut self, at: DateTime<FixedOffset>) -> Result<String, CacheError> {
        let Some(id) = self.active().id.clone() else {
            return Err(CacheError::Consistency {
                id: "<none>".into(),
                list: EntryList::Running.name(),
            });
        };
        {
            let active = self.active_mut();
            active.is_paused = Some(true);
            active.time_paused = Some(at);
        }
        let entry = if self.running.len() == 1 {
            std::mem::replace(&mut self.running[0], TimeEntry::sentinel())
        } else {
            self.running.remove(0)
        };
        self.paused.push(entry);
        Ok(id)
    }

    /// Recompute accumulated pause hours up to `now`, clear the pause
    /// fields and promote the entry to running position 0. A bare sentinel
    /// in the active slot is evicted rather than displaced.
    pub fn resume_paused(
        &mut self,
        id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<(), CacheError> {
        let idx = self
            .paused
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| CacheError::Consistency {
                id: id.to_string(),
                list: EntryList::Paused.name(),
            })?;
        let mut entry = self.paused.remove(idx);
        if let Some(time_paused) = entry.time_paused {
            entry.paused_hrs = duration::add_elapsed_pause(now, time_paused, entry.paused_hrs);
        }
        entry.is_paused = Some(false);
        entry.time_paused = None;

        if !self.is_active() {
            self.running.remove(0);
        }
        self.running.insert(0, entry);
        self.restore_invariant();
        Ok(())
    }

    /// Reset position 0 to the sentinel in place if it is the only running
    /// entry, otherwise remove it and shift.
    pub fn clear_active(&mut self) {
        if self.running.len() == 1 {
            self.running[0] = TimeEntry::sentinel();
        } else {
            self.running.remove(0);
        }
    }

    /// Indices of entries in `list` whose id starts with any of `prefixes`.
    pub fn find(&self, list: EntryList, prefixes: &[&str]) -> Vec<usize> {
        let entries = match list {
            EntryList::Running => &self.running,
            EntryList::Paused => &self.paused,
        };
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches_any(e, prefixes))
            .map(|(i, _)| i)
            .collect()
    }

    /// Entries in `list` whose id starts with any of `prefixes`.
    pub fn get(&self, list: EntryList, prefixes: &[&str]) -> Vec<&TimeEntry> {
        let entries = match list {
            EntryList::Running => &self.running,
            EntryList::Paused => &self.paused,
        };
        entries
            .iter()
            .filter(|e| matches_any(e, prefixes))
            .collect()
    }

    pub fn exists(&self, list: EntryList, prefixes: &[&str]) -> bool {
        !self.find(list, prefixes).is_empty()
    }

    /// Remove all entries matching `prefixes` from the given collections.
    pub fn remove(&mut self, lists: &[EntryList], prefixes: &[&str]) {
        for list in lists {
            let entries = match list {
                EntryList::Running => &mut self.running,
                EntryList::Paused => &mut self.paused,
            };
            entries.retain(|e| !matches_any(e, prefixes));
        }
        self.restore_invariant();
    }

    /// Wholesale replacement of both collections (sync path).
    pub fn replace(&mut self, running: Vec<TimeEntry>, paused: Vec<TimeEntry>) {
        self.running = running;
        self.paused = paused;
        self.restore_invariant();
    }
}

fn matches_any(entry: &TimeEntry, prefixes: &[&str]) -> bool {
    entry
        .id
        .as_deref()
        .map(|id| prefixes.iter().any(|p| id.starts_with(p)))
        .unwrap_or(false)
}

/// A cached entry decorated with its live duration, for display.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: TimeEntry,
    #[serde(with = "rust_decimal::serde::str")]
    pub hours: Decimal,
}

/// The file-persisted cache of running and paused time entries.
pub struct EntryCache {
    path: PathBuf,
    lock: FileLock,
    state: RwLock<CacheDocument>,
    tz: FixedOffset,
}

impl EntryCache {
    /// Open the cache at `path`, creating and validating it as needed.
    ///
    /// A missing, empty or unreadable document is replaced with the default
    /// one (sentinel running stack, empty paused set); the cache is a
    /// disposable mirror of the remote store, so repair is silent.
    pub fn open(
        path: impl Into<PathBuf>,
        lock_path: impl Into<PathBuf>,
        tz: FixedOffset,
    ) -> Result<Self, CacheError> {
        let cache = Self {
            path: path.into(),
            lock: FileLock::new(lock_path),
            state: RwLock::new(CacheDocument::default()),
            tz,
        };
        cache.validate_and_repair()?;
        Ok(cache)
    }

    /// Open the cache at the application's default paths.
    pub fn open_default(config: &Config) -> Result<Self, CoreError> {
        let tz = config.utc_offset()?;
        Ok(Self::open(storage::cache_path()?, storage::lock_path()?, tz)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timezone(&self) -> FixedOffset {
        self.tz
    }

    /// Load the on-disk document, resetting it to defaults when it cannot
    /// be read. Returns `true` when a repair happened.
    ///
    /// Only IO-level failures (e.g. permissions) surface as errors.
    pub fn validate_and_repair(&self) -> Result<bool, CacheError> {
        let _guard = self.lock.exclusive()?;
        let mut state = self.write_state();
        if !self.path.exists() {
            let doc = CacheDocument::default();
            Self::persist(&self.path, &doc)?;
            *state = doc;
            return Ok(false);
        }
        match Self::load_document(&self.path, self.tz) {
            Ok(doc) => {
                *state = doc;
                Ok(false)
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "resetting unreadable cache");
                let doc = CacheDocument::default();
                Self::persist(&self.path, &doc)?;
                *state = doc;
                Ok(true)
            }
        }
    }

    /// Reset the cache to its default state.
    pub fn reset(&self) -> Result<(), CacheError> {
        self.transaction(|doc| {
            *doc = CacheDocument::default();
            Ok(())
        })
    }

    /// Run `mutate` against a working copy of the document with both locks
    /// held; commit atomically on success, discard on error.
    pub fn transaction<T>(
        &self,
        mutate: impl FnOnce(&mut CacheDocument) -> Result<T, CacheError>,
    ) -> Result<T, CacheError> {
        let _guard = self.lock.exclusive()?;
        let mut state = self.write_state();

        // Pick up commits made by other processes since our last load.
        *state = match Self::load_document(&self.path, self.tz) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "resetting unreadable cache");
                CacheDocument::default()
            }
        };

        let mut working = state.clone();
        let out = mutate(&mut working)?;
        working.restore_invariant();

        Self::persist(&self.path, &working)?;
        *state = Self::load_document(&self.path, self.tz)?;
        Ok(out)
    }

    /// Snapshot of the current document.
    pub fn snapshot(&self) -> CacheDocument {
        self.read_state().clone()
    }

    pub fn is_active(&self) -> bool {
        self.read_state().is_active()
    }

    pub fn active(&self) -> TimeEntry {
        self.read_state().active().clone()
    }

    pub fn active_id(&self) -> Option<String> {
        self.read_state().active().id.clone()
    }

    // ── Entry operations ─────────────────────────────────────────────

    pub fn start_new_active(&self) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.start_new_active();
            Ok(())
        })
    }

    pub fn switch_active(&self, id: &str) -> Result<(), CacheError> {
        self.transaction(|doc| doc.switch_active(id))
    }

    pub fn pause_active(&self, at: DateTime<FixedOffset>) -> Result<String, CacheError> {
        self.transaction(|doc| doc.pause_active(at))
    }

    pub fn resume_paused(&self, id: &str, now: DateTime<FixedOffset>) -> Result<(), CacheError> {
        self.transaction(|doc| doc.resume_paused(id, now))
    }

    pub fn clear_active(&self) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.clear_active();
            Ok(())
        })
    }

    pub fn remove(&self, lists: &[EntryList], prefixes: &[&str]) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.remove(lists, prefixes);
            Ok(())
        })
    }

    pub fn replace_all(
        &self,
        running: Vec<TimeEntry>,
        paused: Vec<TimeEntry>,
    ) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.replace(running, paused);
            Ok(())
        })
    }

    // ── Active-entry field mutators ──────────────────────────────────
    //
    // Each one implicitly opens a transaction.

    pub fn set_id(&self, id: Option<String>) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.active_mut().id = id;
            Ok(())
        })
    }

    pub fn set_project(&self, project: Option<String>) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.active_mut().project = project;
            Ok(())
        })
    }

    pub fn set_note(&self, note: Option<String>) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.active_mut().note = note;
            Ok(())
        })
    }

    pub fn set_start(&self, start: Option<DateTime<FixedOffset>>) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.active_mut().start = start;
            Ok(())
        })
    }

    pub fn set_billable(&self, billable: Option<bool>) -> Result<(), CacheError> {
        self.transaction(|doc| {
            doc.active_mut().is_billable = billable;
            Ok(())
        })
    }

    /// Display rows for every cached entry with live durations as of `now`.
    ///
    /// Paused entries get their `paused_hrs` refreshed in the returned rows
    /// only; stored state is not touched (pause totals are recomputed from
    /// `time_paused` on resume, never accumulated by polling).
    pub fn snapshot_with_hours(&self, now: DateTime<FixedOffset>) -> Vec<EntryView> {
        let doc = self.snapshot();
        let mut views = Vec::new();

        for entry in doc.running() {
            if entry.is_sentinel() {
                continue;
            }
            let hours = entry
                .start
                .map(|start| duration::elapsed_hours(start, now, entry.paused_hrs))
                .unwrap_or(Decimal::ZERO);
            views.push(EntryView {
                entry: entry.clone(),
                hours,
            });
        }

        for entry in doc.paused() {
            let mut entry = entry.clone();
            if let Some(time_paused) = entry.time_paused {
                entry.paused_hrs =
                    duration::add_elapsed_pause(now, time_paused, entry.paused_hrs);
            }
            let hours = entry
                .start
                .map(|start| duration::elapsed_hours(start, now, entry.paused_hrs))
                .unwrap_or(Decimal::ZERO);
            views.push(EntryView { entry, hours });
        }

        views
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read_state(&self) -> RwLockReadGuard<'_, CacheDocument> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheDocument> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_document(path: &Path, tz: FixedOffset) -> Result<CacheDocument, CacheError> {
        let text = std::fs::read_to_string(path).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(CacheError::Corruption("cache file is empty".into()));
        }
        let mut value: toml::Value = toml::from_str(&text)?;
        let changed = super::entry::upgrade(&mut value, tz)?;
        let file: CacheFile = value.try_into()?;
        let doc = CacheDocument::from_file(file);
        if changed {
            Self::persist(path, &doc)?;
        }
        Ok(doc)
    }

    /// Serialize the full document and atomically replace the cache file.
    fn persist(path: &Path, doc: &CacheDocument) -> Result<(), CacheError> {
        let text = toml::to_string_pretty(&doc.to_file())?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn ts(secs: i64) -> DateTime<FixedOffset> {
        tz().timestamp_opt(secs, 0).unwrap()
    }

    fn open_cache(dir: &tempfile::TempDir) -> EntryCache {
        EntryCache::open(
            dir.path().join("cache.toml"),
            dir.path().join("cache.lock"),
            tz(),
        )
        .unwrap()
    }

    fn start_entry(cache: &EntryCache, id: &str, project: &str, start: DateTime<FixedOffset>) {
        cache
            .transaction(|doc| {
                doc.start_new_active();
                let active = doc.active_mut();
                active.id = Some(id.to_string());
                active.project = Some(project.to_string());
                active.start = Some(start);
                active.is_billable = Some(false);
                active.is_paused = Some(false);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn opens_with_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        assert!(!cache.is_active());
        let doc = cache.snapshot();
        assert_eq!(doc.running().len(), 1);
        assert!(doc.running()[0].is_sentinel());
        assert!(doc.paused().is_empty());
    }

    #[test]
    fn running_stack_never_empties() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);

        start_entry(&cache, "abc1234xyz", "demo", ts(0));
        cache.clear_active().unwrap();
        cache.clear_active().unwrap();
        cache.reset().unwrap();

        assert!(!cache.snapshot().running().is_empty());
    }

    #[test]
    fn start_new_active_displaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);

        start_entry(&cache, "aaaa111zzz", "one", ts(0));
        start_entry(&cache, "bbbb222zzz", "two", ts(10));

        let doc = cache.snapshot();
        assert_eq!(doc.running().len(), 2);
        assert_eq!(doc.active().id.as_deref(), Some("bbbb222zzz"));
        assert_eq!(doc.running()[1].id.as_deref(), Some("aaaa111zzz"));
    }

    #[test]
    fn switch_rotates_preserving_relative_order() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "aaaa111zzz", "one", ts(0));
        start_entry(&cache, "bbbb222zzz", "two", ts(10));
        start_entry(&cache, "cccc333zzz", "three", ts(20));

        cache.switch_active("aaaa111zzz").unwrap();

        let doc = cache.snapshot();
        let ids: Vec<_> = doc.running().iter().map(|e| e.id.as_deref()).collect();
        assert_eq!(
            ids,
            vec![Some("aaaa111zzz"), Some("cccc333zzz"), Some("bbbb222zzz")]
        );
    }

    #[test]
    fn switch_unknown_id_is_consistency_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        let err = cache.switch_active("missing99").unwrap_err();
        assert!(matches!(err, CacheError::Consistency { .. }));
    }

    #[test]
    fn pause_moves_entry_and_restores_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "abc1234xyz", "demo", ts(0));
        cache.set_note(Some("x".into())).unwrap();

        let paused_id = cache.pause_active(ts(100)).unwrap();
        assert_eq!(paused_id, "abc1234xyz");

        let doc = cache.snapshot();
        assert_eq!(doc.running().len(), 1);
        assert!(doc.active().is_sentinel());
        assert_eq!(doc.paused().len(), 1);
        let paused = &doc.paused()[0];
        assert_eq!(paused.is_paused, Some(true));
        assert_eq!(paused.time_paused, Some(ts(100)));
        assert_eq!(paused.paused_hrs, Decimal::ZERO);
        assert_eq!(paused.note.as_deref(), Some("x"));
    }

    #[test]
    fn pause_with_peer_running_entries_promotes_next() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "aaaa111zzz", "one", ts(0));
        start_entry(&cache, "bbbb222zzz", "two", ts(10));

        cache.pause_active(ts(100)).unwrap();

        let doc = cache.snapshot();
        assert_eq!(doc.active().id.as_deref(), Some("aaaa111zzz"));
        assert_eq!(doc.paused()[0].id.as_deref(), Some("bbbb222zzz"));
    }

    #[test]
    fn pause_on_sentinel_is_consistency_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        assert!(matches!(
            cache.pause_active(ts(0)).unwrap_err(),
            CacheError::Consistency { .. }
        ));
    }

    #[test]
    fn resume_recomputes_hours_and_promotes() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "abc1234xyz", "demo", ts(0));
        cache.pause_active(ts(0)).unwrap();

        // 30 minutes paused
        cache.resume_paused("abc1234xyz", ts(1800)).unwrap();

        let doc = cache.snapshot();
        assert!(doc.paused().is_empty());
        assert_eq!(doc.running().len(), 1);
        let active = doc.active();
        assert_eq!(active.id.as_deref(), Some("abc1234xyz"));
        assert_eq!(active.is_paused, Some(false));
        assert_eq!(active.time_paused, None);
        assert_eq!(active.paused_hrs, dec!(0.5000));
    }

    #[test]
    fn resume_unknown_id_is_consistency_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        assert!(matches!(
            cache.resume_paused("missing99", ts(0)).unwrap_err(),
            CacheError::Consistency { .. }
        ));
    }

    #[test]
    fn find_get_remove_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "abc1234xyz", "one", ts(0));
        start_entry(&cache, "abd5678xyz", "two", ts(10));

        let doc = cache.snapshot();
        assert_eq!(doc.find(EntryList::Running, &["ab"]).len(), 2);
        assert_eq!(doc.find(EntryList::Running, &["abc"]), vec![1]);
        assert!(doc.exists(EntryList::Running, &["abd"]));
        assert_eq!(doc.get(EntryList::Running, &["abd"]).len(), 1);

        cache
            .remove(&[EntryList::Running, EntryList::Paused], &["abc"])
            .unwrap();
        let doc = cache.snapshot();
        assert!(!doc.exists(EntryList::Running, &["abc"]));
        assert!(doc.exists(EntryList::Running, &["abd"]));
    }

    #[test]
    fn failed_mutation_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "abc1234xyz", "demo", ts(0));
        let before = std::fs::read_to_string(cache.path()).unwrap();

        let result: Result<(), CacheError> = cache.transaction(|doc| {
            doc.clear_active();
            Err(CacheError::Corruption("boom".into()))
        });
        assert!(result.is_err());

        assert_eq!(std::fs::read_to_string(cache.path()).unwrap(), before);
        assert_eq!(cache.active_id().as_deref(), Some("abc1234xyz"));
    }

    #[test]
    fn persist_then_reload_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = open_cache(&dir);
            start_entry(&cache, "abc1234xyz", "demo", ts(0));
            cache.set_note(Some("round trip".into())).unwrap();
            cache.pause_active(ts(60)).unwrap();
        }
        let reopened = open_cache(&dir);
        let doc = reopened.snapshot();
        assert!(doc.active().is_sentinel());
        assert_eq!(doc.paused()[0].id.as_deref(), Some("abc1234xyz"));
        assert_eq!(doc.paused()[0].note.as_deref(), Some("round trip"));
        assert_eq!(doc.paused()[0].time_paused, Some(ts(60)));
    }

    #[test]
    fn unreadable_file_is_repaired_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cache.toml"), "not [valid toml").unwrap();

        let cache = open_cache(&dir);
        assert!(!cache.is_active());
        // and the repaired document landed on disk
        let text = std::fs::read_to_string(cache.path()).unwrap();
        assert!(text.contains("version = 2"));
    }

    #[test]
    fn empty_file_is_repaired_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cache.toml"), "").unwrap();
        let cache = open_cache(&dir);
        assert_eq!(cache.snapshot(), CacheDocument::default());
    }

    #[test]
    fn snapshot_with_hours_refreshes_paused_totals_without_mutating() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open_cache(&dir);
        start_entry(&cache, "abc1234xyz", "demo", ts(0));
        cache.pause_active(ts(3600)).unwrap();

        let views = cache.snapshot_with_hours(ts(7200));
        assert_eq!(views.len(), 1);
        // one hour of runtime plus one hour paused so far
        assert_eq!(views[0].entry.paused_hrs, dec!(1.0000));
        assert_eq!(views[0].hours, dec!(1.0000));

        // stored state unchanged
        assert_eq!(cache.snapshot().paused()[0].paused_hrs, Decimal::ZERO);
    }
}
