use crate::application_port::*;
use crate::domain_model::UserId;
use crate::logger::*;
use std::sync::Arc;

pub struct TokenAuthorizationGate {
    token_signer: Arc<dyn TokenSigner>,
}

impl TokenAuthorizationGate {
    pub fn new(token_signer: Arc<dyn TokenSigner>) -> Self {
        Self { token_signer }
    }
}

impl AuthorizationGate for TokenAuthorizationGate {
    fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthError> {
        let token = bearer_token(authorization)?;
        self.token_signer.verify(token).map_err(|e| {
            let reason = match e {
                TokenError::Expired => RejectReason::Expired,
                TokenError::Malformed => RejectReason::Malformed,
                TokenError::InvalidSubject => RejectReason::InvalidSubject,
                other => return AuthError::Token(other),
            };
            debug!(%reason, "access token rejected");
            AuthError::Unauthorized(reason)
        })
    }
}
