use crate::domain_model::{User, UserId};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("email already taken")]
    EmailTaken,
    #[error("user not found")]
    NotFound,
    #[error("credential error: {0}")]
    Credential(String),
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct CredentialsInput {
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, input: CredentialsInput) -> Result<User, UserError>;
    async fn update_user(&self, user_id: UserId, input: CredentialsInput)
    -> Result<User, UserError>;
    async fn upgrade(&self, user_id: UserId) -> Result<(), UserError>;
    /// Delete every user along with their chirps and refresh tokens.
    async fn reset(&self) -> Result<(), UserError>;
}
