use crate::application_port::AccessToken;
use crate::domain_model::UserId;
use chrono::Duration;

pub const ISSUER: &str = "chirpy";
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing error: {0}")]
    Signing(String),
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token subject is not a user id")]
    InvalidSubject,
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Signed, self-contained access tokens.
pub trait TokenSigner: Send + Sync {
    /// `ttl` may be zero or negative, which yields a token that is already expired.
    fn issue(&self, subject: UserId, ttl: Duration) -> Result<AccessToken, TokenError>;

    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

/// Random strings used as refresh tokens.
pub trait OpaqueTokenGenerator: Send + Sync {
    fn generate(&self) -> Result<String, TokenError>;
}
