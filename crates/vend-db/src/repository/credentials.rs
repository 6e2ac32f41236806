//! # Credential Repository
//!
//! Stores the single owner login. The password is kept as an argon2 PHC
//! string; the plain text never reaches the database.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    owner_id: String,
    password_hash: String,
}

/// Repository for the owner's credentials.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CredentialRepository { pool }
    }

    /// Whether an owner has been registered yet.
    pub async fn exists(&self) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owner_credentials")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Registers (or replaces) the owner login.
    ///
    /// ## Errors
    /// `Credentials` if either value is blank or hashing fails.
    pub async fn set(&self, owner_id: &str, password: &str) -> DbResult<()> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() || password.is_empty() {
            return Err(DbError::Credentials(
                "owner id and password must not be empty".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;

        sqlx::query(
            r#"
            INSERT INTO owner_credentials (id, owner_id, password_hash, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                password_hash = excluded.password_hash,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(owner_id)
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!(owner_id = %owner_id, "Owner credentials stored");
        Ok(())
    }

    /// Checks a login attempt. Unknown owner or wrong password yield `false`.
    pub async fn verify(&self, owner_id: &str, password: &str) -> DbResult<bool> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT owner_id, password_hash FROM owner_credentials WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            warn!("Login attempted before any owner was registered");
            return Ok(false);
        };

        let ok = row.owner_id == owner_id.trim() && verify_password(password, &row.password_hash);
        if !ok {
            warn!("Owner login rejected");
        }
        Ok(ok)
    }
}

fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Credentials(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_and_verify() {
        let db = test_db().await;
        let creds = db.credentials();
        assert!(!creds.exists().await.unwrap());
        assert!(!creds.verify("owner", "secret").await.unwrap());

        creds.set("owner", "secret").await.unwrap();
        assert!(creds.exists().await.unwrap());

        assert!(creds.verify("owner", "secret").await.unwrap());
        assert!(!creds.verify("owner", "wrong").await.unwrap());
        assert!(!creds.verify("intruder", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plain_text() {
        let db = test_db().await;
        db.credentials().set("owner", "secret").await.unwrap();

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM owner_credentials WHERE id = 1")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_ne!(stored, "secret");
        assert!(stored.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_set_replaces_existing_owner() {
        let db = test_db().await;
        let creds = db.credentials();
        creds.set("first", "one").await.unwrap();
        creds.set("second", "two").await.unwrap();

        assert!(!creds.verify("first", "one").await.unwrap());
        assert!(creds.verify("second", "two").await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let db = test_db().await;
        let err = db.credentials().set("  ", "pw").await.unwrap_err();
        assert!(matches!(err, DbError::Credentials(_)));
        assert!(db.credentials().set("owner", "").await.is_err());
    }
}
