//! Cryptographic primitives for the x470 protocol.
//!
//! - **Ed25519** detached signatures (Solana-style keys)
//! - **Base58** transport encoding for public keys and signatures
//! - **Base64url** encoding for nonces and proof tokens
//! - A pluggable [`NonceSource`] for challenge randomness

pub mod encoding;
pub mod keys;
pub mod random;
pub mod sign;

pub use encoding::{
    b64url_decode, b64url_encode, decode_private_key, decode_public_key, decode_signature,
    encode_private_key, encode_public_key, encode_signature, EncodingError,
};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use random::{NonceSource, OsNonceSource, RandomSourceError};
pub use sign::{sign_message, verify_signature};
