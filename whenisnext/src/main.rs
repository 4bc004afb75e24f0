use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use whenisnext::app::{self, AppError};
use whenisnext::config::{ConfigError, SETTINGS_FILE, Settings, default_base_dir};

/// Simple departure board for SL (Stockholm public transport).
///
/// Reads the tracked stop, line and destination from
/// ~/.whenisnext/settings.toml. Get API keys from Trafiklab.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Look up stops matching a name and print their site ids
    #[arg(short, long, value_name = "SEARCH")]
    lookup: Option<String>,

    /// Settings file to use instead of ~/.whenisnext/settings.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Cache file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries only the result
    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let settings = load_settings(cli.config, cli.store)?;

    match cli.lookup {
        Some(search) => app::lookup_text(&settings, &search).await,
        None => app::departures_line(&settings).await,
    }
}

/// The settings file named on the command line, or the default one.
fn settings_path(config: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match config {
        Some(path) => Ok(path),
        None => Ok(default_base_dir()?.join(SETTINGS_FILE)),
    }
}

/// Load settings, applying the `--store` override last.
fn load_settings(
    config: Option<PathBuf>,
    store: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let settings = Settings::load(&settings_path(config)?)?;
    Ok(match store {
        Some(path) => settings.with_store_path(path),
        None => settings,
    })
}
