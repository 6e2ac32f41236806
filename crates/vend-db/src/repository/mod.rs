//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vend-cli                                                              │
//! │       │  db.inventory().save(&inventory)                               │
//! │       ▼                                                                 │
//! │  InventoryRepository          CredentialRepository                     │
//! │  ├── load()                   ├── exists()                             │
//! │  ├── save(&Inventory)         ├── set(owner_id, password)              │
//! │  └── count()                  └── verify(owner_id, password)           │
//! │       │  SQL                                                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository holds a clone of the pool, so handing one out is cheap.

pub mod credentials;
pub mod inventory;
