//! Challenge issuance.

use std::sync::Arc;

use x470_types::Challenge;

use crate::error::AuthError;
use crate::nonce_store::NonceStore;

/// Mints challenges bound to a resource URL.
pub struct ChallengeIssuer {
    store: Arc<NonceStore>,
}

impl ChallengeIssuer {
    pub fn new(store: Arc<NonceStore>) -> Self {
        Self { store }
    }

    /// Register a fresh nonce and render the challenge for `resource`.
    ///
    /// Fails only when the random source does.
    pub fn issue(&self, resource: &str) -> Result<Challenge, AuthError> {
        let issued = self.store.issue()?;
        tracing::debug!(
            nonce = %issued.nonce,
            resource,
            expires_at = issued.expires_at.as_millis(),
            "issued proof-of-human challenge"
        );
        Ok(Challenge::new(
            resource,
            issued.nonce,
            issued.issued_at,
            issued.expires_at,
        ))
    }
}
