//! # Inventory Repository
//!
//! Loads and saves the whole inventory as one snapshot.
//!
//! ## Snapshot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(&inventory)                    load()                             │
//! │  ────────────────                    ──────                             │
//! │  BEGIN                               SELECT * FROM items ORDER BY code  │
//! │  DELETE FROM items                        │                             │
//! │  INSERT one row per item                  ▼                             │
//! │  COMMIT                              ItemCode::new / ItemRecord::new    │
//! │                                           │  (re-validate every row)    │
//! │  A failure rolls back, leaving the        ▼                             │
//! │  previous snapshot intact.           Inventory::from_records            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use vend_core::{Inventory, ItemCode, ItemRecord, Money};

const TABLE: &str = "items";

/// One row of the `items` table.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    code: i64,
    name: String,
    price_cents: i64,
    quantity: i64,
}

impl ItemRow {
    fn into_domain(self) -> DbResult<(ItemCode, ItemRecord)> {
        let raw = self.code;
        let code = ItemCode::new(raw).map_err(|e| DbError::corrupt(TABLE, raw, e))?;
        let record = ItemRecord::new(self.name, Money::from_cents(self.price_cents), self.quantity)
            .map_err(|e| DbError::corrupt(TABLE, raw, e))?;
        Ok((code, record))
    }
}

/// Repository for the inventory snapshot.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Loads the stored snapshot. An empty table yields an empty inventory.
    ///
    /// ## Errors
    /// `CorruptRecord` if any row breaks the item rules or two rows share a
    /// name case-insensitively.
    pub async fn load(&self) -> DbResult<Inventory> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT code, name, price_cents, quantity
            FROM items
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .map(ItemRow::into_domain)
            .collect::<DbResult<Vec<_>>>()?;

        let inventory =
            Inventory::from_records(records).map_err(|e| DbError::corrupt(TABLE, "*", e))?;

        info!(items = inventory.len(), "Inventory snapshot loaded");
        Ok(inventory)
    }

    /// Replaces the stored snapshot with `inventory`, atomically.
    pub async fn save(&self, inventory: &Inventory) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items").execute(&mut *tx).await?;

        for (code, record) in inventory {
            debug!(code = %code, name = %record.name(), quantity = record.quantity(), "Saving item");

            sqlx::query(
                r#"
                INSERT INTO items (code, name, name_key, price_cents, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(i64::from(code.get()))
            .bind(record.name())
            .bind(record.name().to_lowercase())
            .bind(record.price().cents())
            .bind(record.quantity())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(items = inventory.len(), "Inventory snapshot saved");
        Ok(())
    }

    /// Number of stored items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
