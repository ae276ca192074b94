//! Server configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use x470_types::ProtocolParams;
use x470_utils::LogFormat;

use crate::error::ServerError;

/// Configuration for an x470 server.
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Scheme used when building the resource URL a challenge is bound to.
    #[serde(default = "default_public_scheme")]
    pub public_scheme: String,

    /// Take the scheme from `X-Forwarded-Proto` when present. Only enable
    /// behind a proxy that sets it.
    #[serde(default)]
    pub trust_forwarded_proto: bool,

    /// Challenge validity in milliseconds.
    #[serde(default = "default_challenge_ttl_ms")]
    pub challenge_ttl_ms: u64,

    /// Allowed client clock skew in milliseconds.
    #[serde(default = "default_clock_skew_ms")]
    pub clock_skew_ms: u64,

    /// Random bytes per nonce (before encoding).
    #[serde(default = "default_nonce_bytes")]
    pub nonce_bytes: usize,

    /// How often expired nonces are swept, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Whether to serve Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4700
}

fn default_public_scheme() -> String {
    "http".to_string()
}

fn default_challenge_ttl_ms() -> u64 {
    ProtocolParams::default().challenge_ttl_ms
}

fn default_clock_skew_ms() -> u64 {
    ProtocolParams::default().clock_skew_ms
}

fn default_nonce_bytes() -> usize {
    ProtocolParams::default().nonce_bytes
}

fn default_sweep_interval_secs() -> u64 {
    ProtocolParams::default().sweep_interval_secs
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ServerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServerError> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServerError> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// The protocol parameters this configuration selects.
    pub fn protocol_params(&self) -> ProtocolParams {
        ProtocolParams {
            challenge_ttl_ms: self.challenge_ttl_ms,
            clock_skew_ms: self.clock_skew_ms,
            nonce_bytes: self.nonce_bytes,
            sweep_interval_secs: self.sweep_interval_secs,
        }
    }

    /// Check everything that would otherwise fail late, at request time.
    pub fn validate(&self) -> Result<(), ServerError> {
        self.protocol_params()
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        match self.public_scheme.as_str() {
            "http" | "https" => Ok(()),
            other => Err(ServerError::Config(format!(
                "public_scheme must be \"http\" or \"https\", got {other:?}"
            ))),
        }
    }

    /// `bind_address:port`, ready for a TCP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            public_scheme: default_public_scheme(),
            trust_forwarded_proto: false,
            challenge_ttl_ms: default_challenge_ttl_ms(),
            clock_skew_ms: default_clock_skew_ms(),
            nonce_bytes: default_nonce_bytes(),
            sweep_interval_secs: default_sweep_interval_secs(),
            enable_metrics: false,
            log_format: LogFormat::Human,
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 4700);
        assert_eq!(config.challenge_ttl_ms, 300_000);
        assert_eq!(config.clock_skew_ms, 120_000);
        assert_eq!(config.nonce_bytes, 16);
        assert_eq!(config.sweep_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let config = ServerConfig::from_toml_str(
            r#"
            port = 8080
            public_scheme = "https"
            challenge_ttl_ms = 60000
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_scheme, "https");
        assert_eq!(config.challenge_ttl_ms, 60_000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.clock_skew_ms, 120_000);
        assert_eq!(config.protocol_params().timestamp_window_ms(), 180_000);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ServerConfig {
            enable_metrics: true,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ServerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9999").unwrap();
        let config = ServerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::from_toml_file("/nonexistent/x470.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_scheme = ServerConfig {
            public_scheme: "ftp".into(),
            ..Default::default()
        };
        assert!(bad_scheme.validate().is_err());

        let bad_nonce = ServerConfig {
            nonce_bytes: 1,
            ..Default::default()
        };
        assert!(bad_nonce.validate().is_err());
    }
}
