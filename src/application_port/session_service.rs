use crate::application_port::TokenError;
use crate::domain_model::UserView;
use serde::Serialize;
use std::fmt;

/// Why a token was turned away. Callers only ever see [`AuthError::Unauthorized`]; the
/// reason is kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownToken,
    Revoked,
    Expired,
    Malformed,
    InvalidSubject,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::UnknownToken => "unknown token",
            RejectReason::Revoked => "revoked",
            RejectReason::Expired => "expired",
            RejectReason::Malformed => "malformed",
            RejectReason::InvalidSubject => "invalid subject",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    Authentication,
    #[error("unauthorized: {0}")]
    Unauthorized(RejectReason),
    #[error("missing or malformed bearer token")]
    MissingToken,
    #[error("forbidden")]
    Forbidden,
    #[error("token error: {0}")]
    Token(#[from] TokenError),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub principal: UserView,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    /// Exchange a refresh token for a new access token. The refresh token is left as is.
    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;
    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError>;
}
