//! The HTTP server: gate, router, sweeper and listener wired together.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use x470_auth::Gate;
use x470_crypto::OsNonceSource;
use x470_types::SystemClock;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::metrics::GateMetrics;
use crate::middleware::{AppState, ResourceOrigin};
use crate::routes::router;
use crate::shutdown::ShutdownController;
use crate::sweeper::spawn_nonce_sweeper;

pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Build a server backed by the system clock and the OS random source.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let gate = Gate::new(
            &config.protocol_params(),
            Arc::new(SystemClock),
            Arc::new(OsNonceSource),
        )?;
        Self::with_gate(config, gate)
    }

    /// Build a server around an already constructed gate.
    pub fn with_gate(config: ServerConfig, gate: Gate) -> Result<Self, ServerError> {
        let state = AppState {
            gate: Arc::new(gate),
            metrics: Arc::new(GateMetrics::new()?),
            origin: ResourceOrigin {
                scheme: config.public_scheme.clone(),
                trust_forwarded_proto: config.trust_forwarded_proto,
            },
        };
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        router(self.state.clone(), self.config.enable_metrics)
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        Ok(TcpListener::bind(self.config.listen_addr()).await?)
    }

    /// Serve on `listener` until `shutdown` fires, sweeping nonces meanwhile.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: &ShutdownController,
    ) -> Result<(), ServerError> {
        let sweeper = spawn_nonce_sweeper(
            self.state.gate.store().clone(),
            self.state.metrics.clone(),
            Duration::from_secs(self.config.sweep_interval_secs),
            shutdown.subscribe(),
        );

        tracing::info!(addr = %listener.local_addr()?, "x470 server listening");

        let mut shutdown_rx = shutdown.subscribe();
        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await;

        // Stop the sweeper even when the listener failed on its own.
        shutdown.shutdown();
        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "nonce sweeper task failed");
        }

        result?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind and serve. Returns once `shutdown` fires and in-flight requests drain.
    pub async fn start(&self, shutdown: &ShutdownController) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
