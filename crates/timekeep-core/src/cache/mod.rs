//! Local file-persisted cache of running and paused time entries.
//!
//! The cache lets the CLI answer "what timer is running right now"
//! instantly, across process invocations, without a network round trip.
//! The remote timesheet remains the system of record; everything in here
//! is disposable and rebuilt by [`crate::remote::sync::SyncEngine`].

mod entry;
mod lock;
mod store;

pub use entry::{TimeEntry, NO_PROJECT, SCHEMA_VERSION};
pub use lock::{FileLock, LockGuard};
pub use store::{CacheDocument, EntryCache, EntryList, EntryView};
