use clap::Subcommand;

use super::{now, open_cache};

#[derive(Subcommand)]
pub enum CacheAction {
    /// Print the cached entries with live durations
    Show,
    /// Validate the cache file, resetting it to defaults if unreadable
    Repair,
    /// Reset the cache to its default state
    Reset,
}

pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let cache = open_cache()?;

    match action {
        CacheAction::Show => {
            let views = cache.snapshot_with_hours(now(&cache));
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        CacheAction::Repair => {
            // open_cache already validated once; run it again explicitly so
            // the user gets a definitive answer.
            if cache.validate_and_repair()? {
                println!("cache was unreadable and has been reset");
            } else {
                println!("cache ok");
            }
        }
        CacheAction::Reset => {
            cache.reset()?;
            println!("cache reset to defaults");
        }
    }
    Ok(())
}
