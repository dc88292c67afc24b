use crate::domain_model::*;
use crate::domain_port::{Clock, RefreshTokenRepo, StoreError};
use chrono::Duration;
use std::sync::Arc;

/// Lifecycle of persisted refresh tokens. Holds no cache; every call goes to the repo.
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepo>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenStore {
    pub fn new(repo: Arc<dyn RefreshTokenRepo>, clock: Arc<dyn Clock>) -> Self {
        RefreshTokenStore { repo, clock }
    }

    pub async fn create(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<RefreshTokenRecord, StoreError> {
        let now = self.clock.now();
        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
            revoked_at: None,
        };
        self.repo.create_refresh_token(&record).await?;
        Ok(record)
    }

    pub async fn lookup(&self, token: &str) -> Result<RefreshTokenRecord, StoreError> {
        self.repo.get_refresh_token(token).await
    }

    pub async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.repo.revoke_refresh_token(token, self.clock.now()).await
    }

    pub fn status(&self, record: &RefreshTokenRecord) -> RefreshTokenStatus {
        record.status(self.clock.now())
    }

    pub fn is_usable(&self, record: &RefreshTokenRecord) -> bool {
        record.is_usable(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::{ManualClock, MemoryStore};
    use chrono::Utc;

    fn store() -> (RefreshTokenStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let repo = Arc::new(MemoryStore::new());
        (RefreshTokenStore::new(repo, clock.clone()), clock)
    }

    #[tokio::test]
    async fn create_then_lookup() {
        let (store, _) = store();
        let user_id = UserId::new();

        store.create(user_id, "tok-1", Duration::days(60)).await.unwrap();
        let record = store.lookup("tok-1").await.expect("token should exist");

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert!(store.is_usable(&record));
    }

    #[tokio::test]
    async fn lookup_unknown_is_not_found() {
        let (store, _) = store();
        assert!(matches!(store.lookup("nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let (store, clock) = store();
        store.create(UserId::new(), "tok-1", Duration::days(60)).await.unwrap();

        store.revoke("tok-1").await.unwrap();
        let first = store.lookup("tok-1").await.unwrap();
        assert!(!store.is_usable(&first));

        clock.advance(Duration::minutes(5));
        store.revoke("tok-1").await.expect("second revoke should succeed");
        let second = store.lookup("tok-1").await.unwrap();
        assert_eq!(second.revoked_at, first.revoked_at);
    }

    #[tokio::test]
    async fn revoke_unknown_is_not_found() {
        let (store, _) = store();
        assert!(matches!(store.revoke("nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let (store, clock) = store();
        store.create(UserId::new(), "tok-1", Duration::days(60)).await.unwrap();
        let record = store.lookup("tok-1").await.unwrap();

        clock.advance(Duration::days(60));
        assert!(store.is_usable(&record));

        clock.advance(Duration::seconds(1));
        assert_eq!(store.status(&record), RefreshTokenStatus::Expired);
    }
}
