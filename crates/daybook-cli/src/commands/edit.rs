use daybook_core::store::LocalStore;

use crate::commands::common::{open_local, resolve_note, resolve_note_content};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_edit(
    id_or_prefix: &str,
    title: Option<&str>,
    content_parts: &[String],
    config: &CliConfig,
) -> Result<(), CliError> {
    let local = open_local(config).await?;
    let notes = local.list().await?;
    let mut note = resolve_note(&notes, id_or_prefix)?.clone();

    let mut changed = false;
    if let Some(title) = title {
        note = note.with_title(title);
        changed = true;
    }
    match resolve_note_content(content_parts) {
        Ok(content) => {
            note = note.with_content(content);
            changed = true;
        }
        // Title-only edits keep the existing content.
        Err(CliError::EmptyContent) if changed => {}
        Err(CliError::EmptyContent) => return Err(CliError::NothingToEdit),
        Err(error) => return Err(error),
    }
    note.validate()?;

    local.write(&note).await?;
    println!("Updated {}", note.id);
    Ok(())
}
