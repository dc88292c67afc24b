use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_CHIRP_LEN: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSORED: &str = "****";

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct ChirpId(pub uuid::Uuid);

impl ChirpId {
    pub fn new() -> Self {
        ChirpId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChirpId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(ChirpId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Replaces every space-separated word that matches a profane word (case-insensitively)
/// with `****`. Words carrying punctuation are left alone.
pub fn censor_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn censors_profane_words_in_any_case() {
        let cleaned = censor_profanity("I had something interesting for breakfast Kerfuffle FORNAX");
        assert_eq!(cleaned, "I had something interesting for breakfast **** ****");
    }

    #[test]
    fn leaves_words_with_punctuation_alone() {
        let cleaned = censor_profanity("what a sharbert! indeed");
        assert_eq!(cleaned, "what a sharbert! indeed");
    }

    #[test]
    fn parses_sort_order() {
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn keeps_spacing_intact() {
        let cleaned = censor_profanity("  fornax  ");
        assert_eq!(cleaned, "  ****  ");
    }
}
