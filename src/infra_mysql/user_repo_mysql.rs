use super::util::store_error;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(row: MySqlRow) -> Result<User, StoreError> {
        Ok(User {
            id: row.try_get("id").map_err(store_error)?,
            email: row.try_get("email").map_err(store_error)?,
            password_hash: row.try_get("hashed_password").map_err(store_error)?,
            is_chirpy_red: row.try_get("is_chirpy_red").map_err(store_error)?,
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
INSERT INTO users (id, email, hashed_password, is_chirpy_red, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_chirpy_red)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at
FROM users
WHERE id = ?
"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Self::row_to_user(row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
SELECT id, email, hashed_password, is_chirpy_red, created_at, updated_at
FROM users
WHERE email = ?
"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Self::row_to_user(row)
    }

    async fn update_user_credentials(
        &self,
        user_id: UserId,
        email: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        sqlx::query(
            r#"
UPDATE users
SET email = ?, hashed_password = ?, updated_at = ?
WHERE id = ?
"#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(updated_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        self.get_user_by_id(user_id).await
    }

    async fn set_chirpy_red(
        &self,
        user_id: UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE users SET is_chirpy_red = TRUE, updated_at = ? WHERE id = ?")
                .bind(updated_at)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_users(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
