mod clock;
mod store_error;

pub use clock::*;
pub use store_error::*;

// repo

mod chirp_repo;
mod refresh_token_repo;
mod user_repo;

pub use chirp_repo::*;
pub use refresh_token_repo::*;
pub use user_repo::*;
