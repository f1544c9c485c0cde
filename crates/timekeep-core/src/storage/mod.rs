mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/timekeep[-dev]/` based on TIMEKEEP_ENV.
///
/// Set TIMEKEEP_ENV=dev to use the development data directory, or
/// TIMEKEEP_DATA_DIR to point at an explicit directory (used by tests to
/// isolate cache and config files).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIMEKEEP_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMEKEEP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timekeep-dev")
            } else {
                base_dir.join("timekeep")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Path of the cache document inside the data directory.
pub fn cache_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("cache.toml"))
}

/// Path of the zero-byte inter-process lock marker.
pub fn lock_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("cache.lock"))
}

/// Path of the application config file.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("config.toml"))
}
