//! HTTP binding for the x470 proof-of-human gate.
//!
//! Provides:
//! - [`require_human`]: axum middleware that answers 470 with a challenge
//!   or attaches a [`VerifiedIdentity`](x470_types::VerifiedIdentity)
//! - the demo router (`/`, `/secret`, optional `/metrics`)
//! - the background nonce sweeper and graceful shutdown
//! - [`ServerConfig`] with TOML file support

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod sweeper;

pub use config::ServerConfig;
pub use error::ServerError;
pub use metrics::GateMetrics;
pub use middleware::{require_human, AppState, ResourceOrigin};
pub use routes::router;
pub use server::HttpServer;
pub use shutdown::ShutdownController;
pub use sweeper::spawn_nonce_sweeper;
