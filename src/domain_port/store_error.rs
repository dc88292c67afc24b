#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Duplicate,
    #[error("referenced record does not exist")]
    MissingReference,
    #[error("persistence error: {0}")]
    Persistence(String),
}
