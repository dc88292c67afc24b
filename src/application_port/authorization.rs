use crate::application_port::AuthError;
use crate::domain_model::UserId;

const BEARER_PREFIX: &str = "Bearer ";

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let token = authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingToken)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Fails with [`AuthError::Forbidden`] unless the principal owns the resource.
pub fn require_owner(principal: UserId, owner: UserId) -> Result<(), AuthError> {
    if principal != owner {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

pub trait AuthorizationGate: Send + Sync {
    /// Resolve the principal behind the request's access token.
    fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthError>;

    /// Like [`authenticate`](Self::authenticate), and additionally require the principal to
    /// own the resource.
    fn authorize(&self, authorization: Option<&str>, owner: UserId) -> Result<UserId, AuthError> {
        let principal = self.authenticate(authorization)?;
        require_owner(principal, owner)?;
        Ok(principal)
    }
}
