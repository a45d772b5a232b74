use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tock_cli::commands::{self, delete, edit, export, log, projects, start, status, stop};
use tock_cli::{Cli, Commands, Config};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<tock_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = tock_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok(db)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Start {
            project,
            task,
            notes,
        }) => {
            let db = open_database(cli.config.as_deref())?;
            start::run(&mut stdout, db, project, task, notes)?;
        }
        Some(Commands::Stop) => {
            let db = open_database(cli.config.as_deref())?;
            stop::run(&mut stdout, db)?;
        }
        Some(Commands::Status { json }) => {
            let db = open_database(cli.config.as_deref())?;
            status::run(&mut stdout, &db, *json)?;
        }
        Some(Commands::Projects) => {
            let db = open_database(cli.config.as_deref())?;
            projects::run(&mut stdout, &db)?;
        }
        Some(Commands::Log {
            from,
            to,
            project,
            json,
        }) => {
            let db = open_database(cli.config.as_deref())?;
            let (from, to) = commands::resolve_range(*from, *to);
            log::run(&mut stdout, &db, from, to, project.as_deref(), *json)?;
        }
        Some(Commands::Edit {
            id,
            project,
            task,
            notes,
            start,
            end,
        }) => {
            let db = open_database(cli.config.as_deref())?;
            let fields = edit::EntryEdit {
                project,
                task,
                notes,
                start,
                end: end.as_deref(),
            };
            edit::run(&mut stdout, &db, *id, &fields)?;
        }
        Some(Commands::Delete { id }) => {
            let db = open_database(cli.config.as_deref())?;
            delete::run(&mut stdout, &db, *id)?;
        }
        Some(Commands::Export {
            from,
            to,
            project,
            output,
        }) => {
            let db = open_database(cli.config.as_deref())?;
            let (from, to) = commands::resolve_range(*from, *to);
            export::run(&mut stdout, &db, from, to, project.as_deref(), output.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
