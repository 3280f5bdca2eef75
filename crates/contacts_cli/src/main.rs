//! Operator CLI for the contacts database.
//!
//! # Responsibility
//! - Create or migrate a database file ahead of first server start.
//! - Report the core crate version.

use clap::{Parser, Subcommand};
use contacts_core::db::migrations::current_version;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "contacts_cli")]
#[command(about = "Maintenance commands for the contacts database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database if missing and apply pending migrations
    InitDb {
        /// Path of the SQLite database file
        #[arg(long, default_value = "contacts.db")]
        db: PathBuf,
    },
    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("contacts_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::InitDb { db } => {
            let conn = contacts_core::open_db(&db)?;
            let version = current_version(&conn)?;
            println!("contacts_db path={} schema_version={version}", db.display());
        }
        Commands::Version => {
            println!("contacts_core version={}", contacts_core::core_version());
        }
    }
    Ok(())
}
