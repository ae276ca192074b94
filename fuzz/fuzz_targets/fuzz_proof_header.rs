#![no_main]

use libfuzzer_sys::fuzz_target;
use x470_crypto::b64url_encode;

fuzz_target!(|data: &[u8]| {
    // Raw header text: splitting and base64 must never panic.
    let text = String::from_utf8_lossy(data);
    let _ = x470_auth::parse_proof_header(&text);

    // Wrap the bytes as a token so the JSON and field checks get exercised.
    let wrapped = format!("v1 {}", b64url_encode(data));
    let _ = x470_auth::parse_proof_header(&wrapped);
});
