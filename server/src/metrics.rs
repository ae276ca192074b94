//! Prometheus metrics for the proof-of-human gate.
//!
//! [`GateMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

pub struct GateMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Challenges sent, whether or not a proof was presented.
    pub challenges_issued: IntCounter,
    /// Proofs that passed every check and redeemed their nonce.
    pub proofs_accepted: IntCounter,
    /// Proofs presented and refused.
    pub proofs_rejected: IntCounter,
    /// Expired nonces dropped by the sweeper.
    pub nonces_swept: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Outstanding nonces, sampled on sweep and on scrape.
    pub active_nonces: IntGauge,
}

impl GateMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let challenges_issued = register_int_counter_with_registry!(
            Opts::new("x470_challenges_issued_total", "Total challenges issued"),
            registry
        )?;
        let proofs_accepted = register_int_counter_with_registry!(
            Opts::new("x470_proofs_accepted_total", "Total proofs accepted"),
            registry
        )?;
        let proofs_rejected = register_int_counter_with_registry!(
            Opts::new("x470_proofs_rejected_total", "Total proofs rejected"),
            registry
        )?;
        let nonces_swept = register_int_counter_with_registry!(
            Opts::new(
                "x470_nonces_swept_total",
                "Total expired nonces removed by the sweeper"
            ),
            registry
        )?;
        let active_nonces = register_int_gauge_with_registry!(
            Opts::new("x470_active_nonces", "Outstanding challenge nonces"),
            registry
        )?;

        Ok(Self {
            registry,
            challenges_issued,
            proofs_accepted,
            proofs_rejected,
            nonces_swept,
            active_nonces,
        })
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
