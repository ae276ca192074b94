//! The record produced by a successful proof verification.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The client-asserted signing time of a proof, in milliseconds since epoch.
///
/// Clients may send any finite JSON number. The value is kept as-is so the
/// canonical message can be rebuilt exactly as the client signed it: integral
/// values render without a fractional part (`1700000000000`, not
/// `1700000000000.0`).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ProofTimestamp(f64);

impl ProofTimestamp {
    /// Wrap a value, returning `None` for NaN or infinities.
    pub fn new(millis: f64) -> Option<Self> {
        millis.is_finite().then_some(Self(millis))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis as f64)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Absolute distance to `now_millis`, in milliseconds.
    pub fn distance_from(&self, now_millis: u64) -> f64 {
        (now_millis as f64 - self.0).abs()
    }

    fn is_integral(&self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() < 1e21
    }
}

impl fmt::Display for ProofTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            // covers -0.0
            f.write_str("0")
        } else if self.is_integral() {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for ProofTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() && self.0.abs() <= i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for ProofTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        ProofTimestamp::new(raw).ok_or_else(|| serde::de::Error::custom("timestamp must be finite"))
    }
}

/// Who proved what: attached to the request for downstream handlers.
///
/// Never persisted by the authentication core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Signer's public key, in the base58 form the client submitted.
    pub pubkey: String,
    pub timestamp: ProofTimestamp,
    pub nonce: String,
    pub method: String,
}
