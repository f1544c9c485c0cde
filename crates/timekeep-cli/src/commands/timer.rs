use clap::Subcommand;
use timekeep_core::ids::match_prefix;
use timekeep_core::remote::entry_id;
use timekeep_core::{Config, NO_PROJECT};

use super::{now, open_cache};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a new active entry
    Start {
        /// Project to book the entry under
        #[arg(long, short)]
        project: Option<String>,
        /// Free-form note
        #[arg(long, short)]
        note: Option<String>,
        /// Mark the entry billable
        #[arg(long)]
        billable: bool,
    },
    /// Stop the active entry
    Stop,
    /// Pause the active entry
    Pause,
    /// Resume a paused entry by id prefix
    Resume {
        id: String,
    },
    /// Make another running entry the active one, by id prefix
    Switch {
        id: String,
    },
    /// Show all cached entries with live durations
    Show,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let cache = open_cache()?;
    let at = now(&cache);

    match action {
        TimerAction::Start {
            project,
            note,
            billable,
        } => {
            let project = project.unwrap_or_else(|| NO_PROJECT.to_string());
            let id = entry_id(&project, note.as_deref(), at);
            let billable = billable || config.default_billable;
            cache.transaction(|doc| {
                doc.start_new_active();
                let active = doc.active_mut();
                active.id = Some(id.clone());
                active.project = Some(project.clone());
                active.note = note.clone();
                active.start = Some(at);
                active.is_billable = Some(billable);
                active.is_paused = Some(false);
                Ok(())
            })?;
            println!("{}", serde_json::to_string_pretty(&cache.active())?);
        }
        TimerAction::Stop => {
            cache.clear_active()?;
            println!("{}", serde_json::to_string_pretty(&cache.active())?);
        }
        TimerAction::Pause => {
            let id = cache.pause_active(at)?;
            println!("paused {id}");
        }
        TimerAction::Resume { id } => {
            let snapshot = cache.snapshot();
            let paused_ids: Vec<&str> = snapshot
                .paused()
                .iter()
                .filter_map(|e| e.id.as_deref())
                .collect();
            let id = match_prefix(paused_ids, &id)?;
            cache.resume_paused(&id, at)?;
            println!("{}", serde_json::to_string_pretty(&cache.active())?);
        }
        TimerAction::Switch { id } => {
            let snapshot = cache.snapshot();
            let running_ids: Vec<&str> = snapshot
                .running()
                .iter()
                .filter_map(|e| e.id.as_deref())
                .collect();
            let id = match_prefix(running_ids, &id)?;
            cache.switch_active(&id)?;
            println!("{}", serde_json::to_string_pretty(&cache.active())?);
        }
        TimerAction::Show => {
            let views = cache.snapshot_with_hours(at);
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(())
}
