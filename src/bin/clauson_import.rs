//! Bulk import and maintenance for the dictionary database.
//!
//! ```bash
//! clauson-import import --dir ./data --clear
//! clauson-import fix-normalization
//! clauson-import clear
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clauson_dict::config::DatabaseConfig;
use clauson_dict::database::{self, WordRepository};
use clauson_dict::import::import_directory;

#[derive(Parser)]
#[command(name = "clauson-import")]
#[command(version)]
#[command(about = "Load and maintain Clauson dictionary entries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    database: DatabaseConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every *.json source file in a directory
    Import {
        /// Directory holding the per-range JSON files
        #[arg(long, short)]
        dir: PathBuf,

        /// Empty the words table first
        #[arg(long)]
        clear: bool,
    },
    /// Delete all entries and reset the id sequence
    Clear,
    /// Recompute every normalized_word from its word
    FixNormalization,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,clauson_dict=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = database::connect(&cli.database).await?;
    let repo = WordRepository::new(pool);

    match cli.command {
        Commands::Import { dir, clear } => {
            let report = import_directory(&repo, &dir, clear).await?;
            println!(
                "Imported {} entries from {} files ({} skipped)",
                report.inserted, report.files, report.skipped
            );
        }
        Commands::Clear => {
            let deleted = repo.clear().await?;
            println!("Deleted {deleted} entries");
        }
        Commands::FixNormalization => {
            let repair = repo.repair_normalization().await?;
            println!(
                "Checked {} entries, updated {}",
                repair.processed, repair.changed
            );
        }
    }
    Ok(())
}
