use crate::domain_model::*;
use crate::domain_port::StoreError;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. A taken email yields [`StoreError::Duplicate`].
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    async fn get_user_by_id(&self, user_id: UserId) -> Result<User, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn update_user_credentials(
        &self,
        user_id: UserId,
        email: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;

    async fn set_chirpy_red(
        &self,
        user_id: UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Remove every user. Chirps and refresh tokens go with them.
    async fn delete_all_users(&self) -> Result<(), StoreError>;
}
