#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use x470_auth::{Gate, GateDecision};
use x470_crypto::b64url_encode;
use x470_nullables::{NullClock, NullRandom};
use x470_types::ProtocolParams;

#[derive(Arbitrary, Debug)]
struct Input {
    now: u64,
    pubkey: String,
    signature: String,
    timestamp: f64,
    use_issued_nonce: bool,
    nonce: String,
    resource: String,
}

fuzz_target!(|input: Input| {
    let gate = Gate::new(
        &ProtocolParams::default(),
        Arc::new(NullClock::new(input.now)),
        Arc::new(NullRandom::counter()),
    )
    .unwrap();

    let issued = match gate.authenticate(None, &input.resource).unwrap() {
        GateDecision::ChallengeRequired { challenge, .. } => challenge.nonce,
        GateDecision::Verified(_) => panic!("verified without a proof"),
    };
    let nonce = if input.use_issued_nonce {
        issued
    } else {
        input.nonce
    };

    let payload = format!(
        r#"{{"pubkey":{:?},"signature":{:?},"timestamp":{},"nonce":{:?}}}"#,
        input.pubkey, input.signature, input.timestamp, nonce
    );
    let header = format!("v1 {}", b64url_encode(payload.as_bytes()));

    // Forging an Ed25519 signature is out of reach; a random proof must fail.
    if let Ok(GateDecision::Verified(identity)) = gate.authenticate(Some(&header), &input.resource) {
        panic!("forged proof accepted: {identity:?}");
    }
});
