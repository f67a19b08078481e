use daybook_core::store::LocalStore;
use daybook_core::sync::{DeleteOutcome, TombstoneTracker};

use crate::commands::common::{open_local, open_service, open_state, resolve_note};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_delete(id_or_prefix: &str, config: &CliConfig) -> Result<(), CliError> {
    let local = open_local(config).await?;
    let notes = local.list().await?;
    let id = resolve_note(&notes, id_or_prefix)?.id.clone();

    if config.remote_dir.is_some() {
        let service = open_service(config).await?;
        match service.delete_note(&id).await? {
            DeleteOutcome::Deleted => println!("Deleted {id} locally and remotely"),
            DeleteOutcome::PendingRemote => {
                println!("Deleted {id} locally; any remote copy stays suppressed until its deletion is confirmed");
            }
        }
        return Ok(());
    }

    // No remote configured: tombstone first anyway so a later sync against a
    // newly configured remote cannot resurrect the note.
    let mut tracker = TombstoneTracker::load(open_state(config)).await?;
    tracker.suppress(&id).await?;
    local.delete(&id).await?;
    println!("Deleted {id}");
    Ok(())
}
