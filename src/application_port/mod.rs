mod authorization;
mod chirp_service;
mod credential;
mod session_service;
mod token;
mod user_service;

pub use authorization::*;
pub use chirp_service::*;
pub use credential::*;
pub use session_service::*;
pub use token::*;
pub use user_service::*;
