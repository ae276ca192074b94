//! Randomness for challenge nonces.
//!
//! Nonce generation goes through [`NonceSource`] so the issuer can be driven
//! by a deterministic source in tests. A failing source is an environment
//! problem and surfaces as [`RandomSourceError`].

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("random source failure: {0}")]
pub struct RandomSourceError(pub String);

/// A source of cryptographically secure random bytes.
pub trait NonceSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError>;
}

/// The operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| RandomSourceError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_source_fills_buffer() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        OsNonceSource.fill(&mut a).unwrap();
        OsNonceSource.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
