use thiserror::Error;
use x470_crypto::RandomSourceError;
use x470_types::ParamsError;

/// Failures that are the server's fault, not the client's.
///
/// These propagate as internal errors instead of turning into a challenge.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),

    #[error("invalid protocol parameters: {0}")]
    InvalidParams(#[from] ParamsError),
}

/// Why a submitted proof was refused.
///
/// Used for logs and metrics only. Every variant produces the same
/// challenge-required response so clients cannot probe which check failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("proof header is not `<scheme> <token>`")]
    MalformedHeader,

    #[error("unsupported proof scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("proof token is not valid base64url")]
    BadEncoding,

    #[error("proof token is not valid JSON")]
    BadJson,

    #[error("proof is missing field `{0}`")]
    MissingField(&'static str),

    #[error("proof timestamp is not a finite number")]
    InvalidTimestamp,

    #[error("proof timestamp outside the accepted window")]
    TimestampOutOfWindow,

    #[error("nonce is unknown or expired")]
    UnknownNonce,

    #[error("public key or signature has the wrong encoding or length")]
    BadKeyMaterial,

    #[error("signature does not verify")]
    BadSignature,

    #[error("nonce was already redeemed")]
    NonceAlreadyConsumed,
}
