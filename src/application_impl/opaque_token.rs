use crate::application_port::{OpaqueTokenGenerator, TokenError};
use rand::RngCore;
use rand::rngs::OsRng;

const TOKEN_BYTES: usize = 32;

/// 256 bits from the OS random source, hex-encoded.
#[derive(Debug, Default)]
pub struct HexTokenGenerator;

impl OpaqueTokenGenerator for HexTokenGenerator {
    fn generate(&self) -> Result<String, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::EntropyUnavailable(e.to_string()))?;
        Ok(hex::encode(bytes))
    }
}
