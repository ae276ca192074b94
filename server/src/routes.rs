//! Demo routes: a public banner, one gated resource, and optional metrics.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};

use x470_types::VerifiedIdentity;

use crate::error::ServerError;
use crate::middleware::{require_human, AppState, METHOD_HEADER, PROOF_HEADER};

pub const BANNER: &str = "x470 Proof-of-Human demo. Try GET /secret";

/// Build the application router.
///
/// `/secret` sits behind [`require_human`]; `/` and `/metrics` do not.
pub fn router(state: AppState, enable_metrics: bool) -> Router {
    let protected = Router::new()
        .route("/secret", get(secret))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_human));

    let mut app = Router::new().route("/", get(banner)).merge(protected);
    if enable_metrics {
        app = app.route("/metrics", get(metrics));
    }

    app.layer(cors_layer()).with_state(state)
}

/// Reflect the caller's origin; no credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(PROOF_HEADER)])
        .expose_headers([HeaderName::from_static(METHOD_HEADER)])
}

async fn banner() -> &'static str {
    BANNER
}

async fn secret(Extension(identity): Extension<VerifiedIdentity>) -> Json<Value> {
    Json(json!({
        "message": "Human verified. Here is the protected data.",
        "you_are": identity,
        "data": {
            "answer": 42,
            "note": "This payload is only visible after x470 proof.",
        },
    }))
}

async fn metrics(State(state): State<AppState>) -> Result<Response, ServerError> {
    state
        .metrics
        .active_nonces
        .set(state.gate.store().len() as i64);
    let body = state.metrics.encode()?;
    Ok((
        [(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        body,
    )
        .into_response())
}
