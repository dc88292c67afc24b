use super::util::store_error;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlChirpRepo {
    pool: MySqlPool,
}

impl MySqlChirpRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlChirpRepo { pool }
    }

    fn row_to_chirp(row: MySqlRow) -> Result<Chirp, StoreError> {
        Ok(Chirp {
            id: row.try_get("id").map_err(store_error)?,
            body: row.try_get("body").map_err(store_error)?,
            user_id: row.try_get("user_id").map_err(store_error)?,
            created_at: row.try_get("created_at").map_err(store_error)?,
            updated_at: row.try_get("updated_at").map_err(store_error)?,
        })
    }
}

#[async_trait::async_trait]
impl ChirpRepo for MySqlChirpRepo {
    async fn create_chirp(&self, chirp: &Chirp) -> Result<(), StoreError> {
        sqlx::query(
            r#"
INSERT INTO chirps (id, body, user_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(chirp.id)
        .bind(&chirp.body)
        .bind(chirp.user_id)
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn list_chirps(
        &self,
        author: Option<UserId>,
        sort: SortOrder,
    ) -> Result<Vec<Chirp>, StoreError> {
        let order = match sort {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let rows = match author {
            Some(user_id) => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps \
                     WHERE user_id = ? ORDER BY created_at {order}"
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps \
                     ORDER BY created_at {order}"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(store_error)?;

        rows.into_iter().map(Self::row_to_chirp).collect()
    }

    async fn get_chirp(&self, chirp_id: ChirpId) -> Result<Chirp, StoreError> {
        let row = sqlx::query(
            r#"
SELECT id, body, user_id, created_at, updated_at
FROM chirps
WHERE id = ?
"#,
        )
        .bind(chirp_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Self::row_to_chirp(row)
    }

    async fn delete_chirp(&self, chirp_id: ChirpId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(chirp_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
