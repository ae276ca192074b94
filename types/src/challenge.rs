//! The challenge document returned to clients that lack a valid proof.

use serde::{Deserialize, Serialize};

use crate::protocol;
use crate::time::Timestamp;

/// A server-issued challenge binding a nonce to a resource and a validity window.
///
/// Built fresh for every challenge response and never stored; only the
/// `nonce -> expires_at` pair survives in the nonce store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub version: String,
    pub method: String,
    pub algo: String,
    /// Fully-qualified URL (scheme + host + path + query) the proof is bound to.
    pub resource: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub nonce: String,
    /// Clients must sign `{timestamp}|{resource}|{nonce}`.
    pub message_format: String,
    /// Name of the request header the proof goes in.
    pub header: String,
}

impl Challenge {
    /// Render a challenge for the current protocol version.
    pub fn new(
        resource: impl Into<String>,
        nonce: impl Into<String>,
        issued_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            version: protocol::VERSION.to_string(),
            method: protocol::METHOD.to_string(),
            algo: protocol::ALGO.to_string(),
            resource: resource.into(),
            issued_at,
            expires_at,
            nonce: nonce.into(),
            message_format: protocol::MESSAGE_FORMAT.to_string(),
            header: protocol::PROOF_HEADER.to_string(),
        }
    }
}
