//! The authentication gate in front of a protected operation.
//!
//! Two states per request: unauthenticated (answer with a challenge) and
//! authenticated (let it through). The gate keeps no state of its own beyond
//! the shared [`NonceStore`].

use std::sync::Arc;

use x470_crypto::NonceSource;
use x470_types::{Challenge, Clock, ProtocolParams, VerifiedIdentity};

use crate::error::{AuthError, Rejection};
use crate::issuer::ChallengeIssuer;
use crate::nonce_store::NonceStore;
use crate::verifier::ProofVerifier;

/// What to do with a request.
#[derive(Debug)]
pub enum GateDecision {
    /// Answer with this challenge instead of running the protected operation.
    ///
    /// `rejection` is set when a proof was presented and refused. It is for
    /// logs and metrics; the challenge sent to the client is the same either way.
    ChallengeRequired {
        challenge: Challenge,
        rejection: Option<Rejection>,
    },
    /// Proceed, with this identity attached to the request.
    Verified(VerifiedIdentity),
}

pub struct Gate {
    store: Arc<NonceStore>,
    issuer: ChallengeIssuer,
    verifier: ProofVerifier,
}

impl Gate {
    /// Wire a nonce store, issuer and verifier around the given capabilities.
    pub fn new(
        params: &ProtocolParams,
        clock: Arc<dyn Clock>,
        random: Arc<dyn NonceSource>,
    ) -> Result<Self, AuthError> {
        params.validate()?;
        let store = Arc::new(NonceStore::new(
            clock.clone(),
            random,
            params.challenge_ttl_ms,
            params.nonce_bytes,
        ));
        Ok(Self {
            issuer: ChallengeIssuer::new(store.clone()),
            verifier: ProofVerifier::new(store.clone(), clock, params),
            store,
        })
    }

    /// The nonce store shared by issuer and verifier, e.g. for the sweeper.
    pub fn store(&self) -> &Arc<NonceStore> {
        &self.store
    }

    /// Decide a request given its proof header (if any) and resource URL.
    ///
    /// Every refusal mints a brand-new challenge; a nonce named in a rejected
    /// proof is never revived. Only a random-source failure returns `Err`.
    pub fn authenticate(
        &self,
        proof_header: Option<&str>,
        resource: &str,
    ) -> Result<GateDecision, AuthError> {
        let rejection = match proof_header {
            None => None,
            Some(header) => match self.verifier.verify(header, resource) {
                Ok(identity) => {
                    tracing::info!(
                        pubkey = %identity.pubkey,
                        nonce = %identity.nonce,
                        resource,
                        "proof of human accepted"
                    );
                    return Ok(GateDecision::Verified(identity));
                }
                Err(rejection) => {
                    tracing::debug!(%rejection, resource, "proof of human rejected");
                    Some(rejection)
                }
            },
        };

        let challenge = self.issuer.issue(resource).inspect_err(|e| {
            tracing::error!(error = %e, "failed to issue challenge");
        })?;
        Ok(GateDecision::ChallengeRequired {
            challenge,
            rejection,
        })
    }
}
