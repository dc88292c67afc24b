use crate::application_port::*;
use crate::domain_model::UserId;
use crate::domain_port::Clock;
use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    iss: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// HS256 access tokens. Expiry is evaluated against the injected clock, not the system time.
pub struct JwtTokenSigner {
    signing_key: Vec<u8>,
    clock: Arc<dyn Clock>,
}

impl JwtTokenSigner {
    pub fn new(signing_key: impl Into<Vec<u8>>, clock: Arc<dyn Clock>) -> Self {
        JwtTokenSigner {
            signing_key: signing_key.into(),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = false;
        v.leeway = 0;
        v.set_issuer(&[ISSUER]);
        v.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        v
    }
}

impl TokenSigner for JwtTokenSigner {
    fn issue(&self, subject: UserId, ttl: Duration) -> Result<AccessToken, TokenError> {
        if self.signing_key.is_empty() {
            return Err(TokenError::Signing("signing key is empty".to_string()));
        }

        let iat_dt = self.clock.now();
        let exp_dt = iat_dt + ttl;
        let claims = AccessClaims {
            sub: subject.to_string(),
            iss: ISSUER.to_string(),
            iat: iat_dt.timestamp(),
            exp: exp_dt.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(AccessToken(token))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(&self.signing_key),
            &Self::validation(),
        )
        .map_err(|_| TokenError::Malformed)?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::InvalidSubject)
    }
}
