use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{Clock, StoreError, UserRepo};
use crate::logger::*;
use std::sync::Arc;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            credential_hasher,
            clock,
        }
    }

    fn validate(input: &CredentialsInput) -> Result<(), UserError> {
        if input.email.trim().is_empty() {
            return Err(UserError::InvalidInput("email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(UserError::InvalidInput("password is required".to_string()));
        }
        Ok(())
    }

    async fn hash(&self, password: &str) -> Result<String, UserError> {
        self.credential_hasher
            .hash_password(password)
            .await
            .map_err(|e| UserError::Credential(e.to_string()))
    }
}

fn store_error(error: StoreError) -> UserError {
    match error {
        StoreError::NotFound => UserError::NotFound,
        StoreError::Duplicate => UserError::EmailTaken,
        StoreError::MissingReference => UserError::NotFound,
        StoreError::Persistence(e) => UserError::Store(e),
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn create_user(&self, input: CredentialsInput) -> Result<User, UserError> {
        Self::validate(&input)?;
        let password_hash = self.hash(&input.password).await?;

        let now = self.clock.now();
        let user = User {
            id: UserId::new(),
            email: input.email,
            password_hash,
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        self.user_repo.create_user(&user).await.map_err(store_error)?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        input: CredentialsInput,
    ) -> Result<User, UserError> {
        Self::validate(&input)?;
        let password_hash = self.hash(&input.password).await?;

        let user = self
            .user_repo
            .update_user_credentials(
                user_id,
                &input.email,
                &password_hash,
                self.clock.now(),
            )
            .await
            .map_err(store_error)?;

        info!(%user_id, "user credentials updated");
        Ok(user)
    }

    async fn upgrade(&self, user_id: UserId) -> Result<(), UserError> {
        self.user_repo
            .set_chirpy_red(user_id, self.clock.now())
            .await
            .map_err(store_error)?;
        info!(%user_id, "user upgraded to chirpy red");
        Ok(())
    }

    async fn reset(&self) -> Result<(), UserError> {
        self.user_repo.delete_all_users().await.map_err(store_error)?;
        warn!("all users deleted");
        Ok(())
    }
}
