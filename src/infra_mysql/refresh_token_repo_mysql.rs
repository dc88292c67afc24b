use super::util::store_error;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlRefreshTokenRepo {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRefreshTokenRepo { pool }
    }

    fn row_to_record(row: MySqlRow) -> Result<RefreshTokenRecord, StoreError> {
        Ok(RefreshTokenRecord {
            token: row.try_get("token").map_err(store_error)?,
            user_id: row.try_get("user_id").map_err(store_error)?,
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
            expires_at: row.try_get("expires_at").map_err(store_error)?,
            revoked_at: row.try_get("revoked_at").map_err(store_error)?,
        })
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepo for MySqlRefreshTokenRepo {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
VALUES (?, ?, ?, ?, ?, NULL)
"#,
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshTokenRecord, StoreError> {
        let row = sqlx::query(
            r#"
SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
FROM refresh_tokens
WHERE token = ?
"#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Self::row_to_record(row)
    }

    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
UPDATE refresh_tokens
SET revoked_at = ?, updated_at = ?
WHERE token = ? AND revoked_at IS NULL
"#,
        )
        .bind(at)
        .bind(at)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing changed: either already revoked or unknown.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE token = ?")
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        if count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
