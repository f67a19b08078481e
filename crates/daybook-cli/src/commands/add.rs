use daybook_core::models::Note;
use daybook_core::store::LocalStore;

use crate::commands::common::{open_local, resolve_note_content};
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_add(
    title: Option<&str>,
    content_parts: &[String],
    config: &CliConfig,
) -> Result<(), CliError> {
    let content = resolve_note_content(content_parts)?;

    let mut note = Note::new().with_content(content);
    if let Some(title) = title {
        note = note.with_title(title);
    }
    note.validate()?;

    open_local(config).await?.write(&note).await?;
    println!("{}", note.id);
    Ok(())
}
