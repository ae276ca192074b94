//! Nullable random: deterministic nonce bytes.

use std::sync::Mutex;
use x470_crypto::{NonceSource, RandomSourceError};

enum Mode {
    /// Emit a big-endian counter in the trailing bytes, so every call differs.
    Counter(u64),
    Failing,
}

/// A deterministic [`NonceSource`] for testing.
pub struct NullRandom {
    mode: Mutex<Mode>,
}

impl NullRandom {
    /// Distinct output on every call: 1, 2, 3, ... encoded big-endian.
    pub fn counter() -> Self {
        Self {
            mode: Mutex::new(Mode::Counter(0)),
        }
    }

    /// A source whose every call fails.
    pub fn failing() -> Self {
        Self {
            mode: Mutex::new(Mode::Failing),
        }
    }
}

impl NonceSource for NullRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
        let mut mode = self.mode.lock().unwrap();
        match &mut *mode {
            Mode::Counter(next) => {
                *next += 1;
                dest.fill(0);
                let bytes = next.to_be_bytes();
                let n = bytes.len().min(dest.len());
                let start = dest.len() - n;
                dest[start..].copy_from_slice(&bytes[bytes.len() - n..]);
                Ok(())
            }
            Mode::Failing => Err(RandomSourceError("null random configured to fail".into())),
        }
    }
}
