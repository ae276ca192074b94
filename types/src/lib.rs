//! Fundamental types for the x470 proof-of-human protocol.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! timestamps and the clock abstraction, key material, protocol parameters,
//! and the challenge / verified-identity documents exchanged with clients.

pub mod challenge;
pub mod error;
pub mod identity;
pub mod keys;
pub mod params;
pub mod protocol;
pub mod time;

pub use challenge::Challenge;
pub use error::ParamsError;
pub use identity::{ProofTimestamp, VerifiedIdentity};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::ProtocolParams;
pub use time::{Clock, SystemClock, Timestamp};
