//! Inter-process cache locking.
//!
//! A zero-byte marker file next to the cache document carries an OS-level
//! advisory lock (fs2). Holding its exclusive lock is what serializes
//! write-transactions across processes -- the interactive CLI and the
//! background scheduler may touch the cache at the same time.
//!
//! Acquisition blocks indefinitely; contention for a single-user tool is
//! rare and momentary. Failure to open or lock the marker file (e.g.
//! permissions) is fatal for the running command.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// Handle on the lock marker file.
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the exclusive inter-process lock, blocking until it is held.
    ///
    /// The returned guard releases the lock when dropped, on every exit
    /// path including panics.
    pub fn exclusive(&self) -> Result<LockGuard, CacheError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| CacheError::Lock {
                path: self.path.clone(),
                source,
            })?;
        fs2::FileExt::lock_exclusive(&file).map_err(|source| CacheError::Lock {
            path: self.path.clone(),
            source,
        })?;
        Ok(LockGuard { file })
    }
}

/// RAII guard for the exclusive lock.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
