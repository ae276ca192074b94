//! The strings both sides must agree on byte for byte.

use x470_types::ProofTimestamp;

/// Build the canonical signed message: `{timestamp}|{resource}|{nonce}`.
pub fn canonical_message(timestamp: ProofTimestamp, resource: &str, nonce: &str) -> String {
    format!("{timestamp}|{resource}|{nonce}")
}

/// Assemble the resource URL a challenge is bound to.
///
/// The issuing side and the verifying side both call this with fields taken
/// from the same request, so a proof only verifies for the URL it was issued
/// for. `path_and_query` is the request target as received (`/secret?x=1`).
pub fn resource_url(scheme: &str, host: &str, path_and_query: &str) -> String {
    format!("{scheme}://{host}{path_and_query}")
}
