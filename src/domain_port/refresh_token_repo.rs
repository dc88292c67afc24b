use crate::domain_model::*;
use crate::domain_port::StoreError;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait RefreshTokenRepo: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), StoreError>;

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshTokenRecord, StoreError>;

    /// Mark the token revoked at `at`. A token that is already revoked keeps its original
    /// revocation time and the call still succeeds.
    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}
