use crate::application_impl::RefreshTokenStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{StoreError, UserRepo};
use crate::logger::*;
use chrono::Duration;
use std::sync::Arc;

pub struct RealSessionService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_signer: Arc<dyn TokenSigner>,
    token_generator: Arc<dyn OpaqueTokenGenerator>,
    refresh_tokens: Arc<RefreshTokenStore>,
}

impl RealSessionService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_signer: Arc<dyn TokenSigner>,
        token_generator: Arc<dyn OpaqueTokenGenerator>,
        refresh_tokens: Arc<RefreshTokenStore>,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            token_signer,
            token_generator,
            refresh_tokens,
        }
    }

    fn issue_access_token(&self, user_id: UserId) -> Result<AccessToken, AuthError> {
        let token = self
            .token_signer
            .issue(user_id, Duration::seconds(ACCESS_TOKEN_TTL_SECS))?;
        Ok(token)
    }

    fn reject(reason: RejectReason) -> AuthError {
        warn!(%reason, "refresh token rejected");
        AuthError::Unauthorized(reason)
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { email, password } = request;

        let user = match self.user_repo.get_user_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                info!("login rejected: unknown email");
                return Err(AuthError::Authentication);
            }
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        match self
            .credential_hasher
            .verify_password(&user.password_hash, &password)
            .await
        {
            Ok(()) => {}
            Err(CredentialError::Mismatch) => {
                info!(user_id = %user.id, "login rejected: password mismatch");
                return Err(AuthError::Authentication);
            }
            Err(CredentialError::Hashing(e)) => return Err(AuthError::Credential(e)),
        }

        let access_token = self.issue_access_token(user.id)?;

        let refresh_token = self.token_generator.generate()?;
        self.refresh_tokens
            .create(
                user.id,
                &refresh_token,
                Duration::days(REFRESH_TOKEN_TTL_DAYS),
            )
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        info!(user_id = %user.id, "user logged in");

        Ok(LoginResult {
            principal: UserView::from(&user),
            access_token,
            refresh_token: RefreshToken(refresh_token),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let record = match self.refresh_tokens.lookup(refresh_token).await {
            Ok(record) => record,
            Err(StoreError::NotFound) => return Err(Self::reject(RejectReason::UnknownToken)),
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        match self.refresh_tokens.status(&record) {
            RefreshTokenStatus::Usable => {}
            RefreshTokenStatus::Revoked => return Err(Self::reject(RejectReason::Revoked)),
            RefreshTokenStatus::Expired => return Err(Self::reject(RejectReason::Expired)),
        }

        let access_token = self.issue_access_token(record.user_id)?;
        debug!(user_id = %record.user_id, "access token refreshed");
        Ok(access_token)
    }

    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        match self.refresh_tokens.revoke(refresh_token).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(Self::reject(RejectReason::UnknownToken)),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }
}
