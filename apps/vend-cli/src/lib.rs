//! # Vend CLI Library
//!
//! Startup for the text-menu vending machine: flags, config, logging,
//! storage, then the menu shell.
//!
//! ## Module Organization
//! ```text
//! vend_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── vend.toml + VEND_* overrides
//! ├── backend.rs      ◄─── MachineStore trait, SQLite store
//! ├── render.rs       ◄─── Grid tables and receipts
//! ├── shell/
//! │   ├── mod.rs      ◄─── Main menu, prompts, first-run setup
//! │   ├── owner.rs    ◄─── Owner login, loading & managing stock
//! │   └── customer.rs ◄─── Cart building and checkout
//! └── error.rs        ◄─── AppError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! parse flags ──► load config ──► init tracing ──► open SQLite
//!                                                      │
//!                                                      ▼
//!                                   Shell::run (loads snapshot first)
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod render;
pub mod shell;

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use backend::SqliteStore;
use config::AppConfig;
use error::AppResult;
use shell::{Shell, ShellSettings};

/// Text-menu vending machine.
#[derive(Debug, Parser)]
#[command(name = "vend", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "VEND_DB_PATH", value_name = "PATH")]
    pub database: Option<PathBuf>,
}

/// Runs the vending machine until the user exits.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match start(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Vending machine stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn start(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config)?;
    init_tracing(&config.logging.filter);

    let db_path = match cli.database {
        Some(path) => path,
        None => config.database_path()?,
    };
    info!(path = %db_path.display(), machine = %config.machine.name, "Starting vending machine");

    let store = SqliteStore::open(&db_path)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), store, ShellSettings::from(&config));
    shell.run()?;

    info!("Vending machine shut down");
    Ok(())
}

/// Logs go to stderr so they never interleave with the menus.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["vend", "--config", "a.toml", "-d", "b.db"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("b.db")));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["vend", "--bogus"]).is_err());
    }
}
