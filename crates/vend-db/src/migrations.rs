//! # Schema Migrations
//!
//! `migrations/sqlite/NNN_description.sql` files are compiled into the
//! binary and applied in order the first time a database is opened. A
//! migration that has shipped is never edited; schema changes get a new file.
//!
//! ```text
//! 001_initial_schema.sql   items, owner_credentials
//! ```

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date. Already-applied files are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (embedded, applied_before) = migration_status(pool).await?;
    debug!(embedded, applied_before, "Checking schema version");

    MIGRATOR.run(pool).await?;

    if embedded > applied_before {
        info!(applied = embedded - applied_before, "Schema migrated");
    }
    Ok(())
}

/// `(embedded, applied)` migration counts. A fresh file reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    // The bookkeeping table only exists after the first run.
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
