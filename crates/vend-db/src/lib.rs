//! # vend-db: Database Layer for the Vending Machine
//!
//! Persists the inventory snapshot and the owner's credentials in a local
//! SQLite file, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vending Machine Data Flow                        │
//! │                                                                         │
//! │  vend-cli (startup / Exit / owner Done / purchase)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vend-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │    Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │◄───│ InventoryRepository │  │ (embedded) │ │   │
//! │  │   │  SqlitePool   │    │ CredentialRepository│  │ 001_*.sql  │ │   │
//! │  │   └───────────────┘    └─────────────────────┘  └────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, `vend.db`)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Inventory snapshot and credential repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vend_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("vend.db")).await?;
//! let mut inventory = db.inventory().load().await?;
//! // ... run the machine ...
//! db.inventory().save(&inventory).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::credentials::CredentialRepository;
pub use repository::inventory::InventoryRepository;
