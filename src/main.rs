mod config;
mod db;
mod error;
mod models;
mod operations;

use clap::{Parser, Subcommand};
use config::Config;
use db::query::TransactionQuery;
use db::repository::TransactionStore;
use error::{AppError, ConfigError};
use operations::browse::run_browse;
use operations::fetch::load_recent;
use operations::print::render_plain;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fino-feed", version, about = "Shows your most recent transactions")]
struct Cli {
    /// Store URL, overrides SUPABASE_URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Store API key, overrides SUPABASE_KEY
    #[arg(long, global = true)]
    key: Option<String>,

    /// Read settings from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "fino-feed.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<UserCommands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserCommands {
    /// Interactive list (default)
    Browse,
    /// Print the list once and exit
    Print,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(ConfigError::EnvFile)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    init_tracing(&cli.log_file)?;

    let config = Config::from_env(cli.url, cli.key)?;
    let runtime = tokio::runtime::Runtime::new().map_err(AppError::Runtime)?;
    let store: Arc<dyn TransactionStore> = Arc::new(db::connection::establish_connection(&config)?);

    let command = cli.command.unwrap_or(UserCommands::Browse);
    info!(?command, "starting fino-feed");

    match command {
        UserCommands::Browse => run_browse(runtime.handle(), store),
        UserCommands::Print => {
            let transactions = runtime.block_on(load_recent(store.as_ref(), &TransactionQuery::recent()));
            print!("{}", render_plain(&transactions));
            Ok(())
        }
    }
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(log_file: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| AppError::LogFile {
            path: log_file.to_path_buf(),
            source,
        })?;

    let filter = EnvFilter::try_from_env(config::LOG_FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
