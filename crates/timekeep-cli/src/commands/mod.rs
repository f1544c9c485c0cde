pub mod cache;
pub mod config;
pub mod timer;

use chrono::{DateTime, FixedOffset, Utc};
use timekeep_core::{Config, EntryCache};

/// Open the cache at the application's default paths.
pub fn open_cache() -> Result<EntryCache, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    Ok(EntryCache::open_default(&config)?)
}

/// Now, in the configured timezone.
pub fn now(cache: &EntryCache) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&cache.timezone())
}
