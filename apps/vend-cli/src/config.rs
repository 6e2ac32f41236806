//! # Machine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --database ./vend.db                                               │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     VEND_MACHINE_NAME, VEND_CURRENCY_SYMBOL, VEND_DB_PATH, VEND_LOG    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <PATH>, or the platform config dir:                       │
//! │     ~/.config/vend/vend.toml (Linux)                                   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [machine]
//! name = "Lobby Machine"
//!
//! [display]
//! currency_symbol = "$"
//!
//! [storage]
//! database_path = "/var/lib/vend/vend.db"
//!
//! [logging]
//! filter = "warn,vend_db=info"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

const CONFIG_FILE: &str = "vend.toml";
const DATABASE_FILE: &str = "vend.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSettings {
    /// Shown in the welcome banner.
    #[serde(default = "default_machine_name")]
    pub name: String,
}

fn default_machine_name() -> String {
    "Vending Machine".to_string()
}

impl Default for MachineSettings {
    fn default() -> Self {
        MachineSettings {
            name: default_machine_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Prefix for every amount in tables and receipts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins over this.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub machine: MachineSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads defaults, then the TOML file (if present), then `VEND_*`
    /// environment overrides, then validates.
    ///
    /// An explicitly given `config_path` must exist; the default location
    /// is optional.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &std::path::Path) -> AppResult<Self> {
        info!(?path, "Loading machine config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.machine.name.trim().is_empty() {
            return Err(AppError::config("machine.name must not be empty"));
        }
        if self.display.currency_symbol.trim().is_empty() {
            return Err(AppError::config("display.currency_symbol must not be empty"));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("VEND_MACHINE_NAME") {
            self.machine.name = name;
        }

        if let Some(symbol) = lookup("VEND_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(path) = lookup("VEND_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(filter) = lookup("VEND_LOG") {
            self.logging.filter = filter;
        }
    }

    /// The configured database file, falling back to the platform data dir.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .ok_or_else(|| AppError::config("could not determine a data directory"))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn currency_symbol(&self) -> &str {
        &self.display.currency_symbol
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "vend", "vend")
}
