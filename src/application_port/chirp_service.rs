use crate::domain_model::{Chirp, ChirpId, SortOrder, UserId};

#[derive(Debug, thiserror::Error)]
pub enum ChirpError {
    #[error("chirp is too long")]
    TooLong,
    #[error("chirp not found")]
    NotFound,
    #[error("author does not exist")]
    UnknownAuthor,
    #[error("store error: {0}")]
    Store(String),
}

#[async_trait::async_trait]
pub trait ChirpService: Send + Sync {
    async fn create(&self, author: UserId, body: &str) -> Result<Chirp, ChirpError>;
    async fn list(&self, author: Option<UserId>, sort: SortOrder) -> Result<Vec<Chirp>, ChirpError>;
    async fn get(&self, chirp_id: ChirpId) -> Result<Chirp, ChirpError>;
    /// Ownership must already have been checked by the caller.
    async fn delete(&self, chirp_id: ChirpId) -> Result<(), ChirpError>;
}
