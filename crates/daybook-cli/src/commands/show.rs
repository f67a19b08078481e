use daybook_core::store::LocalStore;

use crate::commands::common::{open_local, resolve_note, sync_marker};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_show(id_or_prefix: &str, config: &CliConfig) -> Result<(), CliError> {
    let notes = open_local(config).await?.list().await?;
    let note = resolve_note(&notes, id_or_prefix)?;

    println!("Title:   {}", note.title);
    println!("Created: {}", note.created_at.to_rfc3339());
    println!("Updated: {}", note.updated_at.to_rfc3339());
    println!("Status:  {}", sync_marker(note));
    println!();
    println!("{}", note.content);
    Ok(())
}
