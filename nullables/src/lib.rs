//! Nullable infrastructure for deterministic testing.
//!
//! The external dependencies of the authentication core (wall clock and
//! random source) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never sleep or touch the OS entropy pool
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod random;

pub use clock::NullClock;
pub use random::NullRandom;
