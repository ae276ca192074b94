//! Transport encodings used on the wire.
//!
//! Public keys and signatures travel as base58 (the Solana text form).
//! Nonces and proof tokens travel as unpadded base64url.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;
use x470_types::keys::{PUBLIC_KEY_LEN, SIGNATURE_LEN};
use x470_types::{PrivateKey, PublicKey, Signature};
use zeroize::Zeroize;

/// Decoder that tolerates optional padding and non-canonical trailing bits,
/// as clients built on Node's `Buffer` produce both.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Encode bytes as unpadded base64url.
pub fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url, accepting padded or unpadded input. Standard-alphabet
/// `+` and `/` are read as their URL-safe counterparts.
pub fn b64url_decode(s: &str) -> Result<Vec<u8>, EncodingError> {
    let normalized: String = s
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    Ok(LENIENT_URL_SAFE.decode(normalized.as_bytes())?)
}

pub fn encode_public_key(key: &PublicKey) -> String {
    bs58::encode(key.as_bytes()).into_string()
}

pub fn encode_signature(sig: &Signature) -> String {
    bs58::encode(sig.as_bytes()).into_string()
}

/// Decode a base58 public key; anything but exactly 32 bytes is an error.
pub fn decode_public_key(s: &str) -> Result<PublicKey, EncodingError> {
    let bytes = bs58::decode(s).into_vec()?;
    PublicKey::from_slice(&bytes).ok_or(EncodingError::InvalidLength {
        expected: PUBLIC_KEY_LEN,
        actual: bytes.len(),
    })
}

/// Decode a base58 signature; anything but exactly 64 bytes is an error.
pub fn decode_signature(s: &str) -> Result<Signature, EncodingError> {
    let bytes = bs58::decode(s).into_vec()?;
    Signature::from_slice(&bytes).ok_or(EncodingError::InvalidLength {
        expected: SIGNATURE_LEN,
        actual: bytes.len(),
    })
}

/// Base58 of the 32-byte secret seed, for storing a client key in a file.
pub fn encode_private_key(key: &PrivateKey) -> String {
    bs58::encode(&key.0).into_string()
}

/// Decode a base58 secret seed. A 64-byte value (seed followed by public key,
/// as wallets export it) is accepted and truncated to the seed.
pub fn decode_private_key(s: &str) -> Result<PrivateKey, EncodingError> {
    let mut bytes = bs58::decode(s.trim()).into_vec()?;
    let result = match bytes.len() {
        32 | 64 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes[..32]);
            Ok(PrivateKey(seed))
        }
        actual => Err(EncodingError::InvalidLength {
            expected: 32,
            actual,
        }),
    };
    bytes.zeroize();
    result
}
