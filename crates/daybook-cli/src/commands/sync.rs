use daybook_core::sync::SyncAttempt;

use crate::commands::common::open_service;
use crate::config::CliConfig;
use crate::error::CliError;

pub async fn run_sync(config: &CliConfig) -> Result<(), CliError> {
    let service = open_service(config).await?;

    match service.try_sync().await {
        SyncAttempt::Completed(report) => {
            println!(
                "Sync completed: {} uploaded, {} downloaded, {} notes total",
                report.uploaded, report.downloaded, report.merged
            );
            if !report.failed_uploads.is_empty() {
                println!(
                    "{} upload(s) failed; they stay local and retry on the next sync",
                    report.failed_uploads.len()
                );
            }
            Ok(())
        }
        SyncAttempt::Failed(error) => Err(error.into()),
        SyncAttempt::AlreadyRunning => {
            println!("A sync is already in progress");
            Ok(())
        }
    }
}
