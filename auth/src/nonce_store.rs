//! Outstanding challenge nonces and their deadlines.
//!
//! A nonce is either absent or active-unused. Redemption deletes it, so a
//! replay finds nothing. Lookup and removal happen under one lock acquisition,
//! which makes [`NonceStore::try_consume`] linearizable: among any number of
//! concurrent callers for the same nonce, exactly one observes `true`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use x470_crypto::{b64url_encode, NonceSource};
use x470_types::{Clock, Timestamp};

use crate::error::AuthError;

/// A freshly registered nonce and its validity window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedNonce {
    pub nonce: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Thread-safe map of `nonce -> expires_at`.
pub struct NonceStore {
    entries: Mutex<HashMap<String, Timestamp>>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn NonceSource>,
    ttl_ms: u64,
    nonce_bytes: usize,
}

impl NonceStore {
    pub fn new(
        clock: Arc<dyn Clock>,
        random: Arc<dyn NonceSource>,
        ttl_ms: u64,
        nonce_bytes: usize,
    ) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            random,
            ttl_ms,
            nonce_bytes,
        }
    }

    // Every critical section is a single map operation, so the map is never
    // left half-updated and a poisoned lock is still safe to use.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Timestamp>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mint a new nonce valid for the configured TTL.
    ///
    /// A collision with an outstanding nonce overwrites it; with 16 random
    /// bytes that never happens in practice.
    pub fn issue(&self) -> Result<IssuedNonce, AuthError> {
        let mut raw = vec![0u8; self.nonce_bytes];
        self.random.fill(&mut raw)?;
        let nonce = b64url_encode(&raw);

        let issued_at = self.clock.now();
        let expires_at = issued_at.plus_millis(self.ttl_ms);
        self.entries().insert(nonce.clone(), expires_at);

        Ok(IssuedNonce {
            nonce,
            issued_at,
            expires_at,
        })
    }

    /// Register an externally chosen nonce. Only used to replay fixed
    /// scenarios in tests.
    #[doc(hidden)]
    pub fn insert(&self, nonce: impl Into<String>, expires_at: Timestamp) {
        self.entries().insert(nonce.into(), expires_at);
    }

    /// Whether `nonce` is outstanding and not yet past its deadline.
    /// Does not consume.
    pub fn is_active(&self, nonce: &str) -> bool {
        let now = self.clock.now();
        self.entries()
            .get(nonce)
            .is_some_and(|expires_at| !expires_at.deadline_passed(now))
    }

    /// Atomically redeem `nonce`.
    ///
    /// The entry is removed whether or not it was still valid; an expired
    /// entry is dead either way. Returns `true` only for the one caller that
    /// removed a live entry.
    pub fn try_consume(&self, nonce: &str) -> bool {
        let now = self.clock.now();
        match self.entries().remove(nonce) {
            Some(expires_at) => !expires_at.deadline_passed(now),
            None => false,
        }
    }

    /// Drop every entry whose deadline is before `now`. Returns how many
    /// were removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at >= now);
        before - entries.len()
    }

    /// [`sweep`](Self::sweep) using the store's own clock.
    pub fn sweep_expired(&self) -> usize {
        self.sweep(self.clock.now())
    }

    /// Number of outstanding nonces, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }
}
