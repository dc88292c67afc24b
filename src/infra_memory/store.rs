use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Users, chirps and refresh tokens kept in concurrent maps. Chirps must reference an
/// existing user, and deleting users cascades, the same way the MySQL foreign keys do.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    chirps: DashMap<ChirpId, Chirp>,
    refresh_tokens: DashMap<String, RefreshTokenRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.len()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<User, StoreError> {
        self.users
            .get(&user_id)
            .map(|user| user.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let user_id = self
            .emails
            .get(email)
            .map(|id| *id.value())
            .ok_or(StoreError::NotFound)?;
        self.get_user_by_id(user_id).await
    }

    async fn update_user_credentials(
        &self,
        user_id: UserId,
        email: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let mut user = self.get_user_by_id(user_id).await?;

        if user.email != email {
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(StoreError::Duplicate),
                Entry::Vacant(slot) => {
                    slot.insert(user_id);
                }
            }
            self.emails.remove(&user.email);
        }

        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = updated_at;
        self.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn set_chirpy_red(
        &self,
        user_id: UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut user = self.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.is_chirpy_red = true;
        user.updated_at = updated_at;
        Ok(())
    }

    async fn delete_all_users(&self) -> Result<(), StoreError> {
        self.refresh_tokens.clear();
        self.chirps.clear();
        self.emails.clear();
        self.users.clear();
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChirpRepo for MemoryStore {
    async fn create_chirp(&self, chirp: &Chirp) -> Result<(), StoreError> {
        if !self.users.contains_key(&chirp.user_id) {
            return Err(StoreError::MissingReference);
        }
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(())
    }

    async fn list_chirps(
        &self,
        author: Option<UserId>,
        sort: SortOrder,
    ) -> Result<Vec<Chirp>, StoreError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .iter()
            .filter(|chirp| author.is_none_or(|author| chirp.user_id == author))
            .map(|chirp| chirp.value().clone())
            .collect();
        chirps.sort_by_key(|chirp| chirp.created_at);
        if sort == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    async fn get_chirp(&self, chirp_id: ChirpId) -> Result<Chirp, StoreError> {
        self.chirps
            .get(&chirp_id)
            .map(|chirp| chirp.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_chirp(&self, chirp_id: ChirpId) -> Result<(), StoreError> {
        self.chirps
            .remove(&chirp_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepo for MemoryStore {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        match self.refresh_tokens.entry(record.token.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshTokenRecord, StoreError> {
        self.refresh_tokens
            .get(token)
            .map(|record| record.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut record = self
            .refresh_tokens
            .get_mut(token)
            .ok_or(StoreError::NotFound)?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(at);
            record.updated_at = at;
        }
        Ok(())
    }
}
