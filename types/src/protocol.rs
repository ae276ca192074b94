//! Wire-level identifiers of the x470 protocol.
//!
//! These strings are echoed verbatim in every challenge and must not change
//! without bumping [`VERSION`].

/// Protocol version tag carried in the challenge document.
pub const VERSION: &str = "x470.v1";

/// Scheme token that prefixes the proof header value (`v1 <token>`).
pub const PROOF_SCHEME: &str = "v1";

/// The only signing method this implementation speaks.
pub const METHOD: &str = "solana-ed25519";

/// Signature algorithm underlying [`METHOD`].
pub const ALGO: &str = "ed25519";

/// Template clients follow when building the signed message.
pub const MESSAGE_FORMAT: &str = "timestamp|url|nonce";

/// Request header carrying the proof.
pub const PROOF_HEADER: &str = "Proof-Of-Human";

/// Response header advertising how to answer a challenge.
pub const METHOD_HEADER: &str = "Proof-Of-Human-Method";

/// Value of [`METHOD_HEADER`] on every challenge response.
pub const METHOD_ADVERTISEMENT: &str =
    "solana-ed25519; header=Proof-Of-Human; format=timestamp|url|nonce";

/// Non-standard HTTP status reserved for "proof of human required".
pub const CHALLENGE_STATUS: u16 = 470;
