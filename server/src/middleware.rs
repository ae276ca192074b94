//! The `require_human` middleware.
//!
//! Wrap protected routes with
//! `route_layer(axum::middleware::from_fn_with_state(state, require_human))`.
//! Requests without a valid `Proof-Of-Human` header get status 470 and a
//! challenge body; requests with one reach the handler with a
//! [`VerifiedIdentity`](x470_types::VerifiedIdentity) in their extensions.

use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use x470_auth::{resource_url, Gate, GateDecision};
use x470_types::{protocol, Challenge};

use crate::error::ServerError;
use crate::metrics::GateMetrics;

/// Lower-case form of [`protocol::PROOF_HEADER`], as stored by `http`.
pub const PROOF_HEADER: &str = "proof-of-human";

/// Lower-case form of [`protocol::METHOD_HEADER`].
pub const METHOD_HEADER: &str = "proof-of-human-method";

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// How the scheme part of the resource URL is chosen.
#[derive(Clone, Debug)]
pub struct ResourceOrigin {
    pub scheme: String,
    pub trust_forwarded_proto: bool,
}

impl ResourceOrigin {
    fn scheme<'a>(&'a self, headers: &'a HeaderMap) -> &'a str {
        if self.trust_forwarded_proto {
            let forwarded = headers
                .get(FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(proto) = forwarded {
                return proto;
            }
        }
        &self.scheme
    }
}

/// Shared state for the router and the middleware.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub metrics: Arc<GateMetrics>,
    pub origin: ResourceOrigin,
}

/// Compute the resource URL for `req` exactly as the client saw it:
/// scheme, `Host`, and the original path and query (before any nesting
/// stripped a prefix).
pub fn request_resource(req: &Request, origin: &ResourceOrigin) -> String {
    let headers = req.headers();
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();

    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| req.uri());
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    resource_url(origin.scheme(headers), &host, path_and_query)
}

/// The 470 response carrying a challenge.
pub fn challenge_response(challenge: Challenge) -> Response {
    let status =
        StatusCode::from_u16(protocol::CHALLENGE_STATUS).unwrap_or(StatusCode::UNAUTHORIZED);
    (
        status,
        [(METHOD_HEADER, protocol::METHOD_ADVERTISEMENT)],
        Json(challenge),
    )
        .into_response()
}

/// Gate a request behind a proof of human.
pub async fn require_human(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let resource = request_resource(&req, &state.origin);
    // A header that is not valid visible ASCII is still a presented proof;
    // it just cannot parse.
    let header = req
        .headers()
        .get(PROOF_HEADER)
        .map(|v| v.to_str().unwrap_or_default().to_string());

    let decision = match state.gate.authenticate(header.as_deref(), &resource) {
        Ok(decision) => decision,
        Err(e) => return ServerError::from(e).into_response(),
    };

    match decision {
        GateDecision::Verified(identity) => {
            state.metrics.proofs_accepted.inc();
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GateDecision::ChallengeRequired {
            challenge,
            rejection,
        } => {
            if rejection.is_some() {
                state.metrics.proofs_rejected.inc();
            }
            state.metrics.challenges_issued.inc();
            challenge_response(challenge)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn origin(trust: bool) -> ResourceOrigin {
        ResourceOrigin {
            scheme: "http".into(),
            trust_forwarded_proto: trust,
        }
    }

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn resource_uses_host_header_and_query() {
        let req = request("/secret?page=2", &[("host", "localhost:4700")]);
        assert_eq!(
            request_resource(&req, &origin(false)),
            "http://localhost:4700/secret?page=2"
        );
    }

    #[test]
    fn forwarded_proto_ignored_unless_trusted() {
        let req = request(
            "/secret",
            &[("host", "example.com"), ("x-forwarded-proto", "https")],
        );
        assert_eq!(request_resource(&req, &origin(false)), "http://example.com/secret");
        assert_eq!(request_resource(&req, &origin(true)), "https://example.com/secret");
    }

    #[test]
    fn original_uri_wins_over_nested_uri() {
        let mut req = request("/secret", &[("host", "example.com")]);
        req.extensions_mut()
            .insert(OriginalUri("/api/secret?x=1".parse().unwrap()));
        assert_eq!(
            request_resource(&req, &origin(false)),
            "http://example.com/api/secret?x=1"
        );
    }

    #[test]
    fn challenge_response_has_status_and_header() {
        let challenge = Challenge::new(
            "http://h/secret",
            "n",
            x470_types::Timestamp::new(0),
            x470_types::Timestamp::new(1),
        );
        let response = challenge_response(challenge);
        assert_eq!(response.status().as_u16(), 470);
        assert_eq!(
            response.headers().get(METHOD_HEADER).unwrap(),
            "solana-ed25519; header=Proof-Of-Human; format=timestamp|url|nonce"
        );
    }
}
