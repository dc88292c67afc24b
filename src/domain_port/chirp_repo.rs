use crate::domain_model::*;
use crate::domain_port::StoreError;

#[async_trait::async_trait]
pub trait ChirpRepo: Send + Sync {
    async fn create_chirp(&self, chirp: &Chirp) -> Result<(), StoreError>;

    /// Chirps ordered by `created_at`, optionally restricted to one author.
    async fn list_chirps(
        &self,
        author: Option<UserId>,
        sort: SortOrder,
    ) -> Result<Vec<Chirp>, StoreError>;

    async fn get_chirp(&self, chirp_id: ChirpId) -> Result<Chirp, StoreError>;

    async fn delete_chirp(&self, chirp_id: ChirpId) -> Result<(), StoreError>;
}
