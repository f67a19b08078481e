use daybook_core::models::unsynced_count;
use daybook_core::store::LocalStore;
use daybook_core::sync::{last_sync_time, TombstoneTracker};

use crate::commands::common::{open_local, open_state, relative_time};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_status(config: &CliConfig) -> Result<(), CliError> {
    let notes = open_local(config).await?.list().await?;
    let state = open_state(config);
    let tracker = TombstoneTracker::load(state.clone()).await?;
    let last_sync = last_sync_time(&state).await?;

    println!(
        "Notes: {} ({} awaiting upload)",
        notes.len(),
        unsynced_count(&notes)
    );
    println!("Pending deletions: {}", tracker.pending());
    match &config.remote_dir {
        Some(remote_dir) => println!(
            "Remote: {} (owner: {})",
            remote_dir.display(),
            config.owner_key
        ),
        None => println!("Remote: not configured"),
    }
    match last_sync {
        Some(instant) => println!(
            "Last sync: {} ({})",
            relative_time(instant),
            instant.to_rfc3339()
        ),
        None => println!("Last sync: never"),
    }
    Ok(())
}
