use daybook_core::models::sorted_by_recency;
use daybook_core::store::LocalStore;

use crate::commands::common::{note_list_item, open_local, relative_time, sync_marker};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, config: &CliConfig) -> Result<(), CliError> {
    let notes = open_local(config).await?.list().await?;
    let mut notes = sorted_by_recency(&notes);
    notes.truncate(limit);

    if as_json {
        let items: Vec<_> = notes.iter().map(note_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("No notes yet. Create one with `daybook add`.");
        return Ok(());
    }

    for note in &notes {
        println!(
            "{}  {:<6}  {:<12}  {}",
            note.id,
            sync_marker(note),
            relative_time(note.updated_at),
            note.preview(60)
        );
    }
    Ok(())
}
