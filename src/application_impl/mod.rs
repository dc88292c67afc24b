mod authorization_gate_impl;
mod chirp_service_impl;
mod credential_hasher_argon2;
mod opaque_token;
mod refresh_token_store;
mod session_service_impl;
mod token_signer_jwt;
mod user_service_impl;

pub use authorization_gate_impl::*;
pub use chirp_service_impl::*;
pub use credential_hasher_argon2::*;
pub use opaque_token::*;
pub use refresh_token_store::*;
pub use session_service_impl::*;
pub use token_signer_jwt::*;
pub use user_service_impl::*;
