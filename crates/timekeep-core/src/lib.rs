//! # Timekeep Core Library
//!
//! Core library for the Timekeep time-tracking CLI. The authoritative
//! timesheet lives in a remote relational store; this crate maintains the
//! local, file-persisted cache that answers "what timer is running right
//! now" instantly, across repeated process invocations, without a network
//! round trip.
//!
//! ## Architecture
//!
//! - **Cache**: a TOML document of running/paused entries with a
//!   transactional whole-document update protocol, guarded by an
//!   in-process reader/writer lock and an inter-process advisory file lock
//! - **Id index**: process-lifetime id list with short-prefix resolution
//! - **Sync engine**: last-writer-wins reconciliation with the remote store
//! - **Worker**: bounded queue for fire-and-forget background jobs
//!
//! ## Key Components
//!
//! - [`EntryCache`]: the transactional cache store
//! - [`EntryIdIndex`]: prefix-to-id resolution
//! - [`SyncEngine`]: cache/remote reconciliation
//! - [`Config`]: application configuration management

pub mod cache;
pub mod duration;
pub mod error;
pub mod ids;
pub mod remote;
pub mod storage;
pub mod worker;

pub use cache::{CacheDocument, EntryCache, EntryList, EntryView, TimeEntry, NO_PROJECT};
pub use error::{CacheError, ConfigError, CoreError, IdError, RemoteError, WorkerError};
pub use ids::EntryIdIndex;
pub use remote::sync::SyncEngine;
pub use remote::{EntryRow, RemoteJob, RemoteStore, SelectQuery};
pub use storage::Config;
pub use worker::WorkerPool;
