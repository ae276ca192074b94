//! Proof-of-human challenge/response core.
//!
//! A client without a valid proof receives a [`Challenge`](x470_types::Challenge)
//! naming a single-use nonce. It signs `{timestamp}|{resource}|{nonce}` with an
//! ed25519 key and retries with a `Proof-Of-Human: v1 <token>` header. The
//! [`Gate`] either lets the request through with a
//! [`VerifiedIdentity`](x470_types::VerifiedIdentity) or answers with a fresh
//! challenge; it never says why a proof was refused.
//!
//! Components, leaf to root:
//! - [`NonceStore`]: the only mutable state; redeem-at-most-once.
//! - [`ChallengeIssuer`]: mints a nonce and renders the challenge.
//! - [`ProofVerifier`]: parses, checks, verifies, then consumes.
//! - [`Gate`]: decides challenge-required vs. pass-through.
//!
//! Nothing here touches HTTP; the server crate maps decisions onto responses.

pub mod error;
pub mod gate;
pub mod issuer;
pub mod message;
pub mod nonce_store;
pub mod proof;
pub mod verifier;

pub use error::{AuthError, Rejection};
pub use gate::{Gate, GateDecision};
pub use issuer::ChallengeIssuer;
pub use message::{canonical_message, resource_url};
pub use nonce_store::{IssuedNonce, NonceStore};
pub use proof::{parse_proof_header, Proof};
pub use verifier::ProofVerifier;
