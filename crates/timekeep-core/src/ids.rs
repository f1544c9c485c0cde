//! Entry-id index with prefix resolution.
//!
//! Users address records by a short prefix of the canonical id. The index
//! holds the full id list, fetched from the remote store once per process
//! and kept current with optimistic appends after known-successful inserts.
//!
//! [`EntryIdIndex`] is an explicit handle constructed once at startup and
//! passed where id resolution is needed; it is internally synchronized and
//! safe to share across threads.

use std::sync::{Arc, Mutex, OnceLock};

use regex::Regex;

use crate::error::IdError;
use crate::remote::{RemoteStore, SelectQuery};

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w{1,40}$").expect("valid id prefix pattern"))
}

/// Check a user-typed prefix against the id shape before any lookup.
pub fn validate_prefix(prefix: &str) -> Result<(), IdError> {
    if prefix_pattern().is_match(prefix) {
        Ok(())
    } else {
        Err(IdError::Validation {
            input: prefix.to_string(),
        })
    }
}

/// Resolve `prefix` against `ids`: exactly one match yields the canonical
/// id, zero is not-found, two or more is ambiguous. Validates the prefix
/// shape first.
pub fn match_prefix<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    prefix: &str,
) -> Result<String, IdError> {
    validate_prefix(prefix)?;
    let mut matching = ids.into_iter().filter(|id| id.starts_with(prefix));
    match (matching.next(), matching.next()) {
        (Some(id), None) => Ok(id.to_string()),
        (Some(_), Some(_)) => Err(IdError::Ambiguous {
            input: prefix.to_string(),
        }),
        (None, _) => Err(IdError::NotFound {
            input: prefix.to_string(),
        }),
    }
}

/// Process-lifetime cache of known entry ids.
pub struct EntryIdIndex {
    remote: Arc<dyn RemoteStore>,
    ids: Mutex<Option<Vec<String>>>,
}

impl EntryIdIndex {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote,
            ids: Mutex::new(None),
        }
    }

    /// The known ids, fetched from the remote store on first access.
    pub fn ids(&self) -> Result<Vec<String>, IdError> {
        let mut guard = self.lock_ids();
        if guard.is_none() {
            let rows = self.remote.select(&SelectQuery::entry_ids())?;
            *guard = Some(rows.into_iter().map(|row| row.id).collect());
        }
        Ok(guard.as_ref().cloned().unwrap_or_default())
    }

    /// Resolve a user-typed prefix to the canonical id.
    ///
    /// The shape check runs before the id list is touched, so a malformed
    /// prefix never triggers a remote fetch.
    pub fn match_id(&self, prefix: &str) -> Result<String, IdError> {
        validate_prefix(prefix)?;
        let ids = self.ids()?;
        match_prefix(ids.iter().map(String::as_str), prefix)
    }

    /// Optimistic append after a known-successful remote insert, avoiding a
    /// full refetch for the common single-insert case. A no-op when the
    /// list has not been fetched yet (the next fetch will include the id).
    pub fn add(&self, id: &str) {
        let mut guard = self.lock_ids();
        if let Some(ids) = guard.as_mut() {
            ids.push(id.to_string());
            tracing::debug!(id, "added id to index");
        }
    }

    /// Drop ids whose records were deleted remotely.
    pub fn remove(&self, ids: &[String]) {
        let mut guard = self.lock_ids();
        if let Some(known) = guard.as_mut() {
            known.retain(|id| !ids.contains(id));
        }
    }

    /// Force the next access to refetch.
    pub fn invalidate(&self) {
        *self.lock_ids() = None;
    }

    /// Drop and eagerly reload the id list.
    pub fn reset(&self) -> Result<(), IdError> {
        self.invalidate();
        self.ids().map(drop)
    }

    fn lock_ids(&self) -> std::sync::MutexGuard<'_, Option<Vec<String>>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
