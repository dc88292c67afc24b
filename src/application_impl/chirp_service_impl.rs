use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{ChirpRepo, Clock, StoreError};
use crate::logger::*;
use std::sync::Arc;

pub struct RealChirpService {
    chirp_repo: Arc<dyn ChirpRepo>,
    clock: Arc<dyn Clock>,
}

impl RealChirpService {
    pub fn new(chirp_repo: Arc<dyn ChirpRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { chirp_repo, clock }
    }
}

fn store_error(error: StoreError) -> ChirpError {
    match error {
        StoreError::NotFound => ChirpError::NotFound,
        StoreError::MissingReference => ChirpError::UnknownAuthor,
        e => ChirpError::Store(e.to_string()),
    }
}

#[async_trait::async_trait]
impl ChirpService for RealChirpService {
    async fn create(&self, author: UserId, body: &str) -> Result<Chirp, ChirpError> {
        if body.chars().count() > MAX_CHIRP_LEN {
            return Err(ChirpError::TooLong);
        }

        let now = self.clock.now();
        let chirp = Chirp {
            id: ChirpId::new(),
            body: censor_profanity(body),
            user_id: author,
            created_at: now,
            updated_at: now,
        };
        self.chirp_repo
            .create_chirp(&chirp)
            .await
            .map_err(store_error)?;

        debug!(chirp_id = %chirp.id, user_id = %author, "chirp created");
        Ok(chirp)
    }

    async fn list(&self, author: Option<UserId>, sort: SortOrder) -> Result<Vec<Chirp>, ChirpError> {
        self.chirp_repo
            .list_chirps(author, sort)
            .await
            .map_err(store_error)
    }

    async fn get(&self, chirp_id: ChirpId) -> Result<Chirp, ChirpError> {
        self.chirp_repo.get_chirp(chirp_id).await.map_err(store_error)
    }

    async fn delete(&self, chirp_id: ChirpId) -> Result<(), ChirpError> {
        self.chirp_repo
            .delete_chirp(chirp_id)
            .await
            .map_err(store_error)?;
        info!(%chirp_id, "chirp deleted");
        Ok(())
    }
}
