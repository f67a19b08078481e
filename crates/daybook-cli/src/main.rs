//! Daybook CLI - journal notes that stay consistent across devices.
//!
//! Notes live as plain `<id>.txt` files in a local folder; `daybook sync`
//! reconciles them against a remote folder (e.g. a mounted drive directory).

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod config;
mod error;

use commands::{run_add, run_delete, run_edit, run_list, run_show, run_status, run_sync};
use config::CliConfig;
use error::CliError;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Journal notes that stay consistent across devices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Optional data directory (notes and sync state)
    #[arg(long, value_name = "PATH", global = true)]
    data_dir: Option<PathBuf>,

    /// Optional remote folder synced by a drive client
    #[arg(long, value_name = "PATH", global = true)]
    remote_dir: Option<PathBuf>,

    /// Quick capture: daybook "dear diary..."
    #[arg(trailing_var_arg = true)]
    note: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Optional title (defaults to the creation timestamp)
        #[arg(long)]
        title: Option<String>,
        /// Note content (reads stdin when omitted)
        content: Vec<String>,
    },
    /// List notes, newest first
    List {
        /// Number of notes to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a note in full
    Show {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Edit an existing note
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content (reads stdin when omitted)
        content: Vec<String>,
    },
    /// Delete a note locally and remotely
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Sync with the remote folder
    Sync,
    /// Show sync status
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("daybook=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.data_dir, cli.remote_dir);

    match cli.command {
        Some(Commands::Add { title, content }) => {
            run_add(title.as_deref(), &content, &config).await?;
        }
        Some(Commands::List { limit, json }) => run_list(limit, json, &config).await?,
        Some(Commands::Show { id }) => run_show(&id, &config).await?,
        Some(Commands::Edit { id, title, content }) => {
            run_edit(&id, title.as_deref(), &content, &config).await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, &config).await?,
        Some(Commands::Sync) => run_sync(&config).await?,
        Some(Commands::Status) => run_status(&config).await?,
        None => {
            // Quick capture mode: daybook "a passing thought"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(None, &cli.note, &config).await?;
            }
        }
    }

    Ok(())
}
