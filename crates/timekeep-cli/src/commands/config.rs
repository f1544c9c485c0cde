use clap::Subcommand;
use timekeep_core::storage::{self, Config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a config value
    Get { key: String },
    /// Set a config value and persist it
    Set { key: String, value: String },
    /// Print all config values
    List,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in ["timezone", "default_billable"] {
                if let Some(value) = config.get(key) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", storage::config_path()?.display());
        }
    }
    Ok(())
}
