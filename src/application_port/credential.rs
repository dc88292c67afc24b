#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password does not match")]
    Mismatch,
    #[error("hashing error: {0}")]
    Hashing(String),
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    async fn verify_password(&self, password_hash: &str, password: &str)
    -> Result<(), CredentialError>;
}
