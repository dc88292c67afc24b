use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    Usable,
    Revoked,
    Expired,
}

impl fmt::Display for RefreshTokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefreshTokenStatus::Usable => "usable",
            RefreshTokenStatus::Revoked => "revoked",
            RefreshTokenStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

impl RefreshTokenRecord {
    /// Revocation wins over expiry when both apply.
    pub fn status(&self, now: DateTime<Utc>) -> RefreshTokenStatus {
        if self.revoked_at.is_some() {
            RefreshTokenStatus::Revoked
        } else if now > self.expires_at {
            RefreshTokenStatus::Expired
        } else {
            RefreshTokenStatus::Usable
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == RefreshTokenStatus::Usable
    }
}
