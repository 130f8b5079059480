//! PostgreSQL implementation of UserStore.
//!
//! Documents live in the `users` table as one JSONB object per key. A merge
//! is a single `INSERT .. ON CONFLICT DO UPDATE` statement, so concurrent
//! grants for the same key never lose each other's fields.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::domain::entitlement::MergePatch;
use crate::domain::foundation::UserId;
use crate::ports::{StoreError, UserStore};

/// PostgreSQL implementation of the UserStore port.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Creates a new PostgresUserStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Literal fields come in as one JSONB object (`$2`); server-timestamp
/// fields are named in `$3` and stamped with `now()` in the database.
const UPSERT_MERGE_SQL: &str = r#"
    INSERT INTO users (id, data, created_at, updated_at)
    VALUES (
        $1,
        $2::jsonb || COALESCE(
            (SELECT jsonb_object_agg(name, to_jsonb(now())) FROM unnest($3::text[]) AS name),
            '{}'::jsonb
        ),
        now(),
        now()
    )
    ON CONFLICT (id) DO UPDATE SET
        data = users.data || EXCLUDED.data,
        updated_at = now()
"#;

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn upsert_merge(&self, user_id: &UserId, patch: MergePatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let (literals, stamped) = patch.partition();

        sqlx::query(UPSERT_MERGE_SQL)
            .bind(user_id.as_str())
            .bind(Value::Object(literals))
            .bind(&stamped)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
