//! # Machine Store
//!
//! The shell's view of persistence: a whole-inventory snapshot plus the
//! owner login. The menu loop is synchronous, so the SQLite store owns a
//! current-thread tokio runtime and blocks on each `vend-db` call.
//!
//! ```text
//! Shell ──► MachineStore ──┬──► SqliteStore ──block_on──► vend-db ──► SQLite
//!                          └──► MemoryStore (tests)
//! ```

use std::path::Path;
use tokio::runtime::{Builder, Runtime};
use tracing::info;
use vend_core::Inventory;
use vend_db::{Database, DbConfig};

use crate::error::AppResult;

/// Persistence used by the shell.
pub trait MachineStore {
    fn load_inventory(&mut self) -> AppResult<Inventory>;

    /// Replaces the stored snapshot.
    fn save_inventory(&mut self, inventory: &Inventory) -> AppResult<()>;

    fn has_owner(&mut self) -> AppResult<bool>;

    fn register_owner(&mut self, owner_id: &str, password: &str) -> AppResult<()>;

    fn verify_owner(&mut self, owner_id: &str, password: &str) -> AppResult<bool>;
}

// =============================================================================
// SQLite
// =============================================================================

pub struct SqliteStore {
    runtime: Runtime,
    db: Database,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`, parent dirs included.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::with_config(DbConfig::new(path))
    }

    pub fn with_config(config: DbConfig) -> AppResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let db = runtime.block_on(Database::new(config))?;
        info!("Machine store ready");
        Ok(SqliteStore { runtime, db })
    }
}

impl MachineStore for SqliteStore {
    fn load_inventory(&mut self) -> AppResult<Inventory> {
        Ok(self.runtime.block_on(self.db.inventory().load())?)
    }

    fn save_inventory(&mut self, inventory: &Inventory) -> AppResult<()> {
        Ok(self.runtime.block_on(self.db.inventory().save(inventory))?)
    }

    fn has_owner(&mut self) -> AppResult<bool> {
        Ok(self.runtime.block_on(self.db.credentials().exists())?)
    }

    fn register_owner(&mut self, owner_id: &str, password: &str) -> AppResult<()> {
        Ok(self
            .runtime
            .block_on(self.db.credentials().set(owner_id, password))?)
    }

    fn verify_owner(&mut self, owner_id: &str, password: &str) -> AppResult<bool> {
        Ok(self
            .runtime
            .block_on(self.db.credentials().verify(owner_id, password))?)
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.db.close());
    }
}

// =============================================================================
// In-memory (tests)
// =============================================================================

#[cfg(test)]
pub(crate) use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::*;

    /// Keeps everything in memory and counts saves.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryStore {
        pub inventory: Inventory,
        pub owner: Option<(String, String)>,
        pub saves: usize,
    }

    impl MemoryStore {
        pub fn with_owner(owner_id: &str, password: &str) -> Self {
            MemoryStore {
                owner: Some((owner_id.to_string(), password.to_string())),
                ..Default::default()
            }
        }
    }

    impl MachineStore for MemoryStore {
        fn load_inventory(&mut self) -> AppResult<Inventory> {
            Ok(self.inventory.clone())
        }

        fn save_inventory(&mut self, inventory: &Inventory) -> AppResult<()> {
            self.inventory = inventory.clone();
            self.saves += 1;
            Ok(())
        }

        fn has_owner(&mut self) -> AppResult<bool> {
            Ok(self.owner.is_some())
        }

        fn register_owner(&mut self, owner_id: &str, password: &str) -> AppResult<()> {
            self.owner = Some((owner_id.to_string(), password.to_string()));
            Ok(())
        }

        fn verify_owner(&mut self, owner_id: &str, password: &str) -> AppResult<bool> {
            Ok(self
                .owner
                .as_ref()
                .is_some_and(|(id, pw)| id == owner_id && pw == password))
        }
    }
}
