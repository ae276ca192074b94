//! The `Proof-Of-Human` header: parsing on the server, building on the client.
//!
//! Header value: `v1 <base64url(JSON)>` where the JSON object is
//! `{pubkey, signature, timestamp, nonce}`; `pubkey` and `signature` are
//! base58, `timestamp` is milliseconds since epoch.

use serde::Serialize;
use serde_json::Value;
use x470_crypto::{b64url_decode, b64url_encode, encode_public_key, encode_signature, sign_message};
use x470_types::{protocol, Challenge, KeyPair, ProofTimestamp};

use crate::error::Rejection;
use crate::message::canonical_message;

/// A client-submitted proof with every field present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Proof {
    pub pubkey: String,
    pub signature: String,
    pub timestamp: ProofTimestamp,
    pub nonce: String,
}

/// Parse a proof header value, checking only structure.
///
/// Covers the scheme, the token encoding, field presence and the timestamp
/// being a finite number. Cryptographic and freshness checks belong to the
/// verifier.
pub fn parse_proof_header(header: &str) -> Result<Proof, Rejection> {
    let mut parts = header.split(char::is_whitespace);
    let scheme = parts.next().unwrap_or_default();
    let token = parts.find(|p| !p.is_empty()).unwrap_or_default();
    if scheme.is_empty() || token.is_empty() {
        return Err(Rejection::MalformedHeader);
    }
    if !scheme.eq_ignore_ascii_case(protocol::PROOF_SCHEME) {
        return Err(Rejection::UnsupportedScheme(scheme.to_string()));
    }

    let raw = b64url_decode(token).map_err(|_| Rejection::BadEncoding)?;
    let payload: Value = serde_json::from_slice(&raw).map_err(|_| Rejection::BadJson)?;

    let pubkey = required_str(&payload, "pubkey")?;
    let signature = required_str(&payload, "signature")?;
    let timestamp = required_timestamp(&payload)?;
    let nonce = required_str(&payload, "nonce")?;

    Ok(Proof {
        pubkey,
        signature,
        timestamp,
        nonce,
    })
}

fn required_str(payload: &Value, field: &'static str) -> Result<String, Rejection> {
    match payload.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(Rejection::MissingField(field)),
    }
}

// Numbers and numeric strings are both accepted; `0` counts as present.
fn required_timestamp(payload: &Value) -> Result<ProofTimestamp, Rejection> {
    let raw = match payload.get("timestamp") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if !s.is_empty() => s.trim().parse::<f64>().ok(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(Rejection::MissingField("timestamp"));
        }
        Some(_) => None,
    };
    raw.and_then(ProofTimestamp::new)
        .ok_or(Rejection::InvalidTimestamp)
}

impl Proof {
    /// Sign the canonical message for `resource` and `nonce` at `timestamp`.
    pub fn sign(keypair: &KeyPair, resource: &str, nonce: &str, timestamp: ProofTimestamp) -> Self {
        let message = canonical_message(timestamp, resource, nonce);
        let signature = sign_message(message.as_bytes(), &keypair.private);
        Self {
            pubkey: encode_public_key(&keypair.public),
            signature: encode_signature(&signature),
            timestamp,
            nonce: nonce.to_string(),
        }
    }

    /// Answer a challenge as received from the server.
    pub fn for_challenge(keypair: &KeyPair, challenge: &Challenge, timestamp: ProofTimestamp) -> Self {
        Self::sign(keypair, &challenge.resource, &challenge.nonce, timestamp)
    }

    /// The base64url token carried after the scheme.
    pub fn to_token(&self) -> String {
        // Serializing a struct of strings and a finite number cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        b64url_encode(&json)
    }

    /// The full `Proof-Of-Human` header value.
    pub fn to_header_value(&self) -> String {
        format!("{} {}", protocol::PROOF_SCHEME, self.to_token())
    }
}
