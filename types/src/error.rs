//! Errors raised while validating protocol parameters.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("challenge TTL must be greater than zero")]
    ZeroTtl,

    #[error("nonce length {0} is below the minimum of {min} bytes", min = crate::params::MIN_NONCE_BYTES)]
    NonceTooShort(usize),

    #[error("nonce length {0} exceeds the maximum of {max} bytes", max = crate::params::MAX_NONCE_BYTES)]
    NonceTooLong(usize),

    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,
}
