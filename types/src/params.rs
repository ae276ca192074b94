//! Protocol parameters: the time windows and sizes that govern challenges.

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Smallest nonce length accepted by [`ProtocolParams::validate`].
pub const MIN_NONCE_BYTES: usize = 8;

/// Largest nonce length accepted by [`ProtocolParams::validate`].
pub const MAX_NONCE_BYTES: usize = 64;

/// Tunables for challenge issuance and proof verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// How long an issued challenge stays redeemable, in milliseconds.
    /// Default: 5 minutes.
    pub challenge_ttl_ms: u64,

    /// Tolerated difference between the client's asserted signing time and
    /// the server clock, in milliseconds. Default: 2 minutes.
    ///
    /// Verification checks `|now - timestamp| <= challenge_ttl_ms + clock_skew_ms`
    /// as a single combined bound.
    pub clock_skew_ms: u64,

    /// Random bytes drawn per nonce before base64url encoding. Default: 16.
    pub nonce_bytes: usize,

    /// Cadence of the background sweep that drops expired nonces, in seconds.
    /// Default: 30.
    pub sweep_interval_secs: u64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            challenge_ttl_ms: 5 * 60 * 1000,
            clock_skew_ms: 2 * 60 * 1000,
            nonce_bytes: 16,
            sweep_interval_secs: 30,
        }
    }
}

impl ProtocolParams {
    /// The combined freshness window applied to a proof's timestamp.
    pub fn timestamp_window_ms(&self) -> u64 {
        self.challenge_ttl_ms.saturating_add(self.clock_skew_ms)
    }

    /// Reject parameter sets that would make the protocol unusable or weak.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.challenge_ttl_ms == 0 {
            return Err(ParamsError::ZeroTtl);
        }
        if self.nonce_bytes < MIN_NONCE_BYTES {
            return Err(ParamsError::NonceTooShort(self.nonce_bytes));
        }
        if self.nonce_bytes > MAX_NONCE_BYTES {
            return Err(ParamsError::NonceTooLong(self.nonce_bytes));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ParamsError::ZeroSweepInterval);
        }
        Ok(())
    }
}
