use anyhow::{Context, Result};
use apex::{
    db::SqliteStore,
    types::{Config, OutputFmt},
};
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

// Not async: SqliteStore owns its runtime and blocks on it.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt = if cli.json {
        OutputFmt::Json
    } else {
        OutputFmt::Text
    };

    let config_path = commands::config::config_path()?;
    let cfg = Config::load(&config_path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cfg.get("log").unwrap_or("warn"))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let open_store = || -> Result<SqliteStore> {
        let db_path = commands::config::db_path(&cfg)?;
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {}", db_path.display()))
    };

    match cli.cmd {
        Commands::Profile(cmd) => commands::profile::handle(cmd, &open_store()?, fmt)?,
        Commands::Plan(cmd) => commands::plan::handle(cmd, &open_store()?, fmt)?,
        Commands::Session(cmd) => commands::session::handle(cmd, &open_store()?, fmt)?,
        Commands::Review { week } => commands::review::handle(week, &open_store()?, fmt)?,
        Commands::Suggest(cmd) => commands::suggest::handle(cmd, &open_store()?, fmt)?,
        Commands::Progress { exercise } => {
            commands::progress::handle(exercise, &open_store()?, fmt)?
        }
        Commands::Swap { exercise } => commands::swap::handle(exercise, fmt)?,
        Commands::Config(cmd) => commands::config::handle(cmd, fmt)?,
    }

    Ok(())
}
