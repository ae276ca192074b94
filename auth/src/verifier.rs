//! Proof verification: the security-critical decision.
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! 1. header structure, token encoding, field presence, numeric timestamp
//! 2. `|now - timestamp| <= ttl + skew`
//! 3. nonce outstanding (peek only)
//! 4. canonical message rebuilt from the *server's* view of the resource
//! 5. base58 key (32 bytes) and signature (64 bytes)
//! 6. ed25519 verification
//! 7. nonce consumed
//!
//! Consumption is last so a proof that fails any earlier check never burns
//! the nonce. Losing the consume race is a rejection even when the signature
//! was good.

use std::sync::Arc;

use x470_crypto::{decode_public_key, decode_signature, verify_signature};
use x470_types::{protocol, Clock, ProtocolParams, VerifiedIdentity};

use crate::error::Rejection;
use crate::message::canonical_message;
use crate::nonce_store::NonceStore;
use crate::proof::parse_proof_header;

pub struct ProofVerifier {
    store: Arc<NonceStore>,
    clock: Arc<dyn Clock>,
    window_ms: u64,
}

impl ProofVerifier {
    pub fn new(store: Arc<NonceStore>, clock: Arc<dyn Clock>, params: &ProtocolParams) -> Self {
        Self {
            store,
            clock,
            window_ms: params.timestamp_window_ms(),
        }
    }

    /// Verify `header` (the raw `Proof-Of-Human` value) for `resource`.
    pub fn verify(&self, header: &str, resource: &str) -> Result<VerifiedIdentity, Rejection> {
        let proof = parse_proof_header(header)?;

        let now = self.clock.now();
        if proof.timestamp.distance_from(now.as_millis()) > self.window_ms as f64 {
            return Err(Rejection::TimestampOutOfWindow);
        }

        if !self.store.is_active(&proof.nonce) {
            return Err(Rejection::UnknownNonce);
        }

        let message = canonical_message(proof.timestamp, resource, &proof.nonce);

        let public_key = decode_public_key(&proof.pubkey).map_err(|_| Rejection::BadKeyMaterial)?;
        let signature = decode_signature(&proof.signature).map_err(|_| Rejection::BadKeyMaterial)?;

        if !verify_signature(message.as_bytes(), &signature, &public_key) {
            return Err(Rejection::BadSignature);
        }

        if !self.store.try_consume(&proof.nonce) {
            return Err(Rejection::NonceAlreadyConsumed);
        }

        Ok(VerifiedIdentity {
            pubkey: proof.pubkey,
            timestamp: proof.timestamp,
            nonce: proof.nonce,
            method: protocol::METHOD.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::Proof;
    use x470_crypto::{b64url_encode, keypair_from_seed};
    use x470_nullables::{NullClock, NullRandom};
    use x470_types::{KeyPair, ProofTimestamp, Timestamp};

    const RESOURCE: &str = "https://x/secret";

    struct Fixture {
        clock: Arc<NullClock>,
        store: Arc<NonceStore>,
        verifier: ProofVerifier,
        keypair: KeyPair,
    }

    fn fixture(now: u64) -> Fixture {
        let params = ProtocolParams::default();
        let clock = Arc::new(NullClock::new(now));
        let store = Arc::new(NonceStore::new(
            clock.clone(),
            Arc::new(NullRandom::counter()),
            params.challenge_ttl_ms,
            params.nonce_bytes,
        ));
        let verifier = ProofVerifier::new(store.clone(), clock.clone(), &params);
        Fixture {
            clock,
            store,
            verifier,
            keypair: keypair_from_seed(&[11u8; 32]),
        }
    }

    #[test]
    fn valid_proof_accepted_once() {
        let f = fixture(1_000);
        let nonce = f.store.issue().unwrap().nonce;
        let header = Proof::sign(&f.keypair, RESOURCE, &nonce, ProofTimestamp::from_millis(1_000))
            .to_header_value();

        let identity = f.verifier.verify(&header, RESOURCE).unwrap();
        assert_eq!(identity.nonce, nonce);
        assert_eq!(identity.method, "solana-ed25519");
        assert_eq!(identity.timestamp, ProofTimestamp::from_millis(1_000));

        assert_eq!(
            f.verifier.verify(&header, RESOURCE),
            Err(Rejection::UnknownNonce)
        );
    }

    #[test]
    fn proof_bound_to_resource() {
        let f = fixture(0);
        let nonce = f.store.issue().unwrap().nonce;
        let header = Proof::sign(&f.keypair, "https://x/a", &nonce, ProofTimestamp::from_millis(0))
            .to_header_value();

        assert_eq!(
            f.verifier.verify(&header, "https://x/b"),
            Err(Rejection::BadSignature)
        );
        // The failed attempt did not burn the nonce.
        assert!(f.store.is_active(&nonce));
        assert!(f.verifier.verify(&header, "https://x/a").is_ok());
    }

    #[test]
    fn timestamp_window_is_ttl_plus_skew() {
        let f = fixture(1_000_000);
        let nonce = f.store.issue().unwrap().nonce;

        let edge = Proof::sign(
            &f.keypair,
            RESOURCE,
            &nonce,
            ProofTimestamp::from_millis(1_000_000 - 420_000),
        );
        let beyond = Proof::sign(
            &f.keypair,
            RESOURCE,
            &nonce,
            ProofTimestamp::from_millis(1_000_000 + 420_001),
        );

        assert_eq!(
            f.verifier.verify(&beyond.to_header_value(), RESOURCE),
            Err(Rejection::TimestampOutOfWindow)
        );
        assert!(f.verifier.verify(&edge.to_header_value(), RESOURCE).is_ok());
    }

    #[test]
    fn expired_nonce_rejected_even_with_fresh_timestamp() {
        let f = fixture(0);
        let nonce = f.store.issue().unwrap().nonce;
        f.clock.set(300_000);
        let header = Proof::sign(&f.keypair, RESOURCE, &nonce, ProofTimestamp::from_millis(300_000))
            .to_header_value();
        assert_eq!(
            f.verifier.verify(&header, RESOURCE),
            Err(Rejection::UnknownNonce)
        );
    }

    #[test]
    fn signature_from_other_key_rejected() {
        let f = fixture(0);
        let nonce = f.store.issue().unwrap().nonce;
        let other = keypair_from_seed(&[12u8; 32]);
        let mut proof = Proof::sign(&other, RESOURCE, &nonce, ProofTimestamp::from_millis(0));
        proof.pubkey = x470_crypto::encode_public_key(&f.keypair.public);
        assert_eq!(
            f.verifier.verify(&proof.to_header_value(), RESOURCE),
            Err(Rejection::BadSignature)
        );
    }

    #[test]
    fn wrong_length_key_material_rejected_before_crypto() {
        let f = fixture(0);
        let nonce = f.store.issue().unwrap().nonce;
        let mut proof = Proof::sign(&f.keypair, RESOURCE, &nonce, ProofTimestamp::from_millis(0));
        proof.pubkey = bs58_of(&[1u8; 31]);
        assert_eq!(
            f.verifier.verify(&proof.to_header_value(), RESOURCE),
            Err(Rejection::BadKeyMaterial)
        );

        let mut proof = Proof::sign(&f.keypair, RESOURCE, &nonce, ProofTimestamp::from_millis(0));
        proof.signature = bs58_of(&[1u8; 63]);
        assert_eq!(
            f.verifier.verify(&proof.to_header_value(), RESOURCE),
            Err(Rejection::BadKeyMaterial)
        );

        let mut proof = Proof::sign(&f.keypair, RESOURCE, &nonce, ProofTimestamp::from_millis(0));
        proof.signature = "0OIl".into();
        assert_eq!(
            f.verifier.verify(&proof.to_header_value(), RESOURCE),
            Err(Rejection::BadKeyMaterial)
        );
        assert!(f.store.is_active(&nonce));
    }

    #[test]
    fn unknown_nonce_rejected() {
        let f = fixture(0);
        let header = Proof::sign(&f.keypair, RESOURCE, "made-up", ProofTimestamp::from_millis(0))
            .to_header_value();
        assert_eq!(
            f.verifier.verify(&header, RESOURCE),
            Err(Rejection::UnknownNonce)
        );
    }

    #[test]
    fn malformed_payload_rejected() {
        let f = fixture(0);
        let token = b64url_encode(br#"{"pubkey":"a","signature":"b","nonce":"c"}"#);
        assert_eq!(
            f.verifier.verify(&format!("v1 {token}"), RESOURCE),
            Err(Rejection::MissingField("timestamp"))
        );
    }

    #[test]
    fn fixed_nonce_scenario() {
        let f = fixture(0);
        f.store.insert("abc", Timestamp::new(300_000));

        let good = Proof::sign(&f.keypair, RESOURCE, "abc", ProofTimestamp::from_millis(0));
        let late = Proof::sign(&f.keypair, RESOURCE, "abc", ProofTimestamp::from_millis(500_000));

        assert_eq!(
            f.verifier.verify(&late.to_header_value(), RESOURCE),
            Err(Rejection::TimestampOutOfWindow)
        );
        assert!(f.verifier.verify(&good.to_header_value(), RESOURCE).is_ok());
        assert!(f.verifier.verify(&good.to_header_value(), RESOURCE).is_err());
    }

    fn bs58_of(bytes: &[u8]) -> String {
        bs58::encode(bytes).into_string()
    }
}
