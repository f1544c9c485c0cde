//! Core error types for timekeep-core.
//!
//! This module defines the error hierarchy using thiserror. Each concern
//! (cache, id resolution, remote store, config, worker) gets its own enum,
//! with `CoreError` as the umbrella type crossing module boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timekeep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Id resolution errors
    #[error(transparent)]
    Id(#[from] IdError),

    /// Remote store errors
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Background worker errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the local entry cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Operation targeted an id that is not in the expected collection.
    #[error("entry '{id}' is not present in the {list} entries")]
    Consistency { id: String, list: &'static str },

    /// The on-disk document does not match any known schema.
    ///
    /// Recovered by resetting the cache to defaults; the remote store is
    /// authoritative and the cache is disposable.
    #[error("cache file is corrupt: {0}")]
    Corruption(String),

    /// Failed to acquire the inter-process lock. Fatal for the command.
    #[error("failed to acquire cache lock at {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or replace the cache file
    #[error("cache IO failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the document
    #[error("failed to serialize cache document: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Failed to deserialize the document
    #[error("failed to deserialize cache document: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Errors raised while resolving a user-typed id prefix.
#[derive(Error, Debug)]
pub enum IdError {
    /// The prefix fails the id shape check before any lookup happens.
    #[error("'{input}' is not a valid id. Provided id must match regex ^\\w{{1,40}}$")]
    Validation { input: String },

    /// Two or more known ids share the prefix.
    #[error("Multiple possible entries starting with '{input}'. Use a longer string to match id.")]
    Ambiguous { input: String },

    /// No known id starts with the prefix.
    #[error("Cannot find entry id: '{input}'")]
    NotFound { input: String },

    /// Fetching the id list from the remote store failed
    #[error("failed to load entry ids: {0}")]
    Remote(#[from] RemoteError),
}

/// Errors surfaced by the remote store contract.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// A select against the remote resource failed
    #[error("query against '{resource}' failed: {message}")]
    Query { resource: String, message: String },

    /// An in-flight remote write finished with an error
    #[error("remote write failed: {0}")]
    JobFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// The application data directory cannot be resolved or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Background worker errors.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The bounded job queue is saturated; the job was not accepted.
    #[error("background queue is full")]
    QueueFull,

    /// The pool is shutting down and no longer accepts work.
    #[error("background worker is shut down")]
    Shutdown,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
