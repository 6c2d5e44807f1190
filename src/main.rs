use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use safelearn_junior::games;
use safelearn_junior::shell;
use safelearn_junior::term::TerminalGuard;
use safelearn_junior::{AppConfig, ConfigError, FileStorage, ProgressStore};

const LOG_FILE: &str = "safelearn.log";

#[derive(Parser)]
#[command(name = "safelearn")]
#[command(about = "Learning games for young children, in the terminal")]
#[command(version)]
struct Cli
{
    /// Path to the config file (defaults to <config dir>/safelearn/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for saved progress (overrides the config file)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands
{
    /// List everything the menu can open
    List,

    /// Print the saved name and progress
    Status,

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()>
{
    let cli = Cli::parse();

    let (mut config, config_err) = AppConfig::load(cli.config.as_deref());
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Some(Commands::List) => list_games(),
        Some(Commands::Config) => {
            report_to_stderr(config_err.as_ref());
            print!("{}", config.to_toml()?);
        }
        Some(Commands::Status) => {
            report_to_stderr(config_err.as_ref());
            let store = ProgressStore::open(FileStorage::new(&config.data_dir));
            for line in shell::status_lines(&store) {
                println!("{line}");
            }
        }
        None => {
            init_logging(&config.data_dir, cli.verbose);
            if let Some(err) = &config_err {
                warn!("{err}; using default settings");
            }
            info!(data_dir = %config.data_dir.display(), "Starting");
            let mut store = ProgressStore::open(FileStorage::new(&config.data_dir));
            let mut term = TerminalGuard::enter().context("Failed to set up the terminal")?;
            shell::run(&mut term, &mut store, &config)?;
        }
    }

    Ok(())
}

fn report_to_stderr(err: Option<&ConfigError>)
{
    if let Some(err) = err {
        eprintln!("warning: {err}; using default settings");
    }
}

/// Log to a file in the data directory; the terminal belongs to the games.
fn init_logging(data_dir: &Path, verbose: bool)
{
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file = fs::create_dir_all(data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))
    });

    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            warn!("Could not open log file in {}: {err}", data_dir.display());
        }
    }
}

fn list_games()
{
    println!("Available screens:");
    for game in games::registry() {
        println!("  {}  {:<18} - {}", game.key, game.title, game.description);
    }
}
