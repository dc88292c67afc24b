mod chirp;
mod refresh_token;
mod user;

pub use chirp::*;
pub use refresh_token::*;
pub use user::*;
