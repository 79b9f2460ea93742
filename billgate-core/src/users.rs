//! User directory collaborator for the reminder pipeline.

use crate::entities::User;
use async_trait::async_trait;
use sqlx::PgPool;

/// Errors surfaced by directory implementations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only view of the users a reminder sweep should consider.
///
/// Implementations pre-filter to users with any reminder enabled; the
/// sweep applies the actual threshold and window checks per user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn reminder_candidates(&self) -> Result<Vec<User>, DirectoryError>;
}

/// Postgres-backed user directory.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn reminder_candidates(&self) -> Result<Vec<User>, DirectoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, telegram_id, upload_used, download_used,
                   transfer_quota, expired_at, remind_traffic, remind_expire
            FROM users
            WHERE remind_traffic OR remind_expire
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

/// Fixed user set, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Vec<User>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn reminder_candidates(&self) -> Result<Vec<User>, DirectoryError> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.remind_traffic || u.remind_expire)
            .cloned()
            .collect())
    }
}
