//! x470 daemon: runs the proof-of-human demo server and, on the client side,
//! generates keys and answers challenges.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use x470_auth::Proof;
use x470_crypto::{
    decode_private_key, encode_private_key, encode_public_key, generate_keypair,
    keypair_from_private,
};
use x470_server::{HttpServer, ServerConfig, ShutdownController};
use x470_types::{Challenge, Clock, ProofTimestamp, SystemClock};
use x470_utils::{format_duration_ms, init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "x470-daemon", about = "x470 Proof-of-Human daemon", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the demo HTTP server with `/secret` behind a proof of human.
    Serve(ServeArgs),
    /// Generate an Ed25519 key pair, printed as base58 JSON.
    Keygen,
    /// Answer a challenge: print a `Proof-Of-Human` header value.
    Sign(SignArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "X470_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port.
    #[arg(long, env = "X470_PORT")]
    port: Option<u16>,

    /// Address to bind to.
    #[arg(long = "bind", env = "X470_BIND")]
    bind_address: Option<String>,

    /// Scheme clients use to reach this server ("http" or "https").
    #[arg(long, env = "X470_PUBLIC_SCHEME")]
    public_scheme: Option<String>,

    /// Take the scheme from X-Forwarded-Proto. Only behind a trusted proxy.
    #[arg(long, env = "X470_TRUST_FORWARDED_PROTO")]
    trust_forwarded_proto: bool,

    /// Challenge validity in milliseconds.
    #[arg(long, env = "X470_CHALLENGE_TTL_MS")]
    challenge_ttl_ms: Option<u64>,

    /// Allowed client clock skew in milliseconds.
    #[arg(long, env = "X470_CLOCK_SKEW_MS")]
    clock_skew_ms: Option<u64>,

    /// Random bytes per nonce.
    #[arg(long, env = "X470_NONCE_BYTES")]
    nonce_bytes: Option<usize>,

    /// Seconds between sweeps of expired nonces.
    #[arg(long, env = "X470_SWEEP_INTERVAL_SECS")]
    sweep_interval_secs: Option<u64>,

    /// Serve Prometheus metrics at /metrics.
    #[arg(long = "metrics", env = "X470_ENABLE_METRICS")]
    enable_metrics: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "X470_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "X470_LOG_LEVEL")]
    log_level: Option<String>,
}

impl ServeArgs {
    /// Apply flags on top of `base`. Boolean flags can only switch a feature on.
    fn merge_into(self, base: ServerConfig) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address.unwrap_or(base.bind_address),
            port: self.port.unwrap_or(base.port),
            public_scheme: self.public_scheme.unwrap_or(base.public_scheme),
            trust_forwarded_proto: self.trust_forwarded_proto || base.trust_forwarded_proto,
            challenge_ttl_ms: self.challenge_ttl_ms.unwrap_or(base.challenge_ttl_ms),
            clock_skew_ms: self.clock_skew_ms.unwrap_or(base.clock_skew_ms),
            nonce_bytes: self.nonce_bytes.unwrap_or(base.nonce_bytes),
            sweep_interval_secs: self.sweep_interval_secs.unwrap_or(base.sweep_interval_secs),
            enable_metrics: self.enable_metrics || base.enable_metrics,
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
        }
    }
}

#[derive(Args)]
struct SignArgs {
    /// Base58 secret key (32-byte seed or 64-byte wallet export).
    #[arg(long, env = "X470_SIGNING_KEY", hide_env_values = true, conflicts_with = "key_file")]
    key: Option<String>,

    /// File holding the base58 secret key.
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Challenge JSON as returned with status 470; "-" reads stdin.
    #[arg(long, default_value = "-")]
    challenge: String,

    /// Timestamp to sign, in Unix milliseconds. Defaults to now.
    #[arg(long)]
    timestamp: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Keygen => keygen(),
        Command::Sign(args) => sign(args),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let config_path = args.config.clone();
    let config = args.merge_into(base);

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = config_path {
        tracing::info!("loaded config from {}", path.display());
    }

    let server = HttpServer::new(config).context("invalid server configuration")?;
    let config = server.config();
    tracing::info!(
        "starting x470 server on {} (challenge ttl {}, clock skew {}, sweep every {}s, metrics {})",
        config.listen_addr(),
        format_duration_ms(config.challenge_ttl_ms),
        format_duration_ms(config.clock_skew_ms),
        config.sweep_interval_secs,
        if config.enable_metrics { "on" } else { "off" },
    );

    let shutdown = Arc::new(ShutdownController::new());
    let signals = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    let listener = server.bind().await.context("binding listener")?;
    let result = server.serve(listener, &shutdown).await;
    signals.abort();
    result?;
    tracing::info!("x470 daemon exited cleanly");
    Ok(())
}

fn keygen() -> anyhow::Result<()> {
    let keypair = generate_keypair();
    let out = serde_json::json!({
        "public_key": encode_public_key(&keypair.public),
        "private_key": encode_private_key(&keypair.private),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn sign(args: SignArgs) -> anyhow::Result<()> {
    let encoded_key = match (args.key, args.key_file) {
        (Some(key), _) => key,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading key file {}", path.display()))?,
        (None, None) => bail!("either --key or --key-file is required"),
    };
    let keypair = keypair_from_private(decode_private_key(&encoded_key)?);

    let challenge_json = if args.challenge == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading challenge from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.challenge)
            .with_context(|| format!("reading challenge {}", args.challenge))?
    };
    let challenge: Challenge =
        serde_json::from_str(&challenge_json).context("challenge is not valid JSON")?;

    let timestamp = args
        .timestamp
        .unwrap_or_else(|| SystemClock.now().as_millis());
    let proof = Proof::for_challenge(&keypair, &challenge, ProofTimestamp::from_millis(timestamp));
    println!("{}", proof.to_header_value());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_args(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["x470-daemon", "serve"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Serve(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn flags_override_file_values() {
        let base = ServerConfig {
            port: 9000,
            clock_skew_ms: 5_000,
            enable_metrics: true,
            ..Default::default()
        };
        let merged = serve_args(&["--port", "4800", "--log-format", "json"]).merge_into(base);
        assert_eq!(merged.port, 4800);
        assert_eq!(merged.clock_skew_ms, 5_000);
        assert!(merged.enable_metrics);
        assert_eq!(merged.log_format, LogFormat::Json);
    }

    #[test]
    fn absent_flags_keep_defaults() {
        let merged = serve_args(&[]).merge_into(ServerConfig::default());
        assert_eq!(merged, ServerConfig::default());
    }
}
