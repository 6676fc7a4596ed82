//! # Runtime Configuration
//!
//! Command-line flags with `LWD_*` environment fallbacks, composed into the
//! per-subsystem configs.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use lw_01_block_cache::BlockCacheConfig;
use lw_02_node_rpc::{NodeRpcConfig, NodeRpcError};
use lw_03_chain_ingestor::{IngestorConfig, IngestorError};
use lw_04_block_retrieval::{RetrievalConfig, RetrievalError};
use lw_05_wallet_gateway::{GatewayConfig, GatewayError};
use lw_telemetry::TelemetryConfig;
use thiserror::Error;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "lightwalletd", version, about = "Compact block server for light wallets")]
pub struct Args {
    /// Address the wallet gateway listens on
    #[arg(long, env = "LWD_BIND_ADDR", default_value = "0.0.0.0:9067")]
    pub bind_addr: SocketAddr,

    /// zcash.conf to read node RPC credentials and port from
    #[arg(long, env = "LWD_ZCASH_CONF")]
    pub zcash_conf: Option<PathBuf>,

    /// Node JSON-RPC URL, overrides zcash.conf
    #[arg(long, env = "LWD_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Node RPC user, overrides zcash.conf
    #[arg(long, env = "LWD_RPC_USER")]
    pub rpc_user: Option<String>,

    /// Node RPC password, overrides zcash.conf
    #[arg(long, env = "LWD_RPC_PASSWORD", hide_env_values = true)]
    pub rpc_password: Option<String>,

    /// Blocks held in memory
    #[arg(long, env = "LWD_CACHE_SIZE", default_value_t = lw_01_block_cache::DEFAULT_MAX_ENTRIES)]
    pub cache_size: u64,

    /// Height to resume ingestion from; raised to Sapling activation if lower
    #[arg(long, env = "LWD_START_HEIGHT")]
    pub start_height: Option<u64>,

    /// Seconds between chain tip polls
    #[arg(long, env = "LWD_POLL_INTERVAL", default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Vendor label reported to wallets
    #[arg(long, env = "LWD_VENDOR", default_value = "lightwalletd")]
    pub vendor: String,

    /// Base URL proving parameter downloads redirect to
    #[arg(long, env = "LWD_PARAMS_URL", default_value = lw_05_wallet_gateway::domain::DEFAULT_PARAMS_BASE_URL)]
    pub params_url: String,

    /// Log filter, e.g. `info` or `lw_03_chain_ingestor=debug,info`
    #[arg(long, env = "LWD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Append logs to this file instead of stdout
    #[arg(long, env = "LWD_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long, env = "LWD_JSON_LOGS")]
    pub json_logs: bool,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Node endpoint or credentials are unusable.
    #[error(transparent)]
    Node(#[from] NodeRpcError),

    /// Cache settings rejected.
    #[error("invalid cache configuration: {0}")]
    Cache(String),

    /// Ingestor settings rejected.
    #[error(transparent)]
    Ingestor(#[from] IngestorError),

    /// Retrieval settings rejected.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Gateway settings rejected.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
    /// Full node endpoint.
    pub node: NodeRpcConfig,
    /// Block cache.
    pub cache: BlockCacheConfig,
    /// Chain-tip ingestor.
    pub ingestor: IngestorConfig,
    /// Retrieval API.
    pub retrieval: RetrievalConfig,
    /// Wallet gateway.
    pub gateway: GatewayConfig,
    /// Resume height; `None` starts at Sapling activation.
    pub start_height: Option<u64>,
}

impl RuntimeConfig {
    /// Build from parsed arguments. Reads zcash.conf when given; explicit
    /// RPC flags win over it.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mut node = match &args.zcash_conf {
            Some(path) => NodeRpcConfig::from_conf_file(path)?,
            None => NodeRpcConfig::default(),
        };
        if let Some(url) = args.rpc_url {
            node.url = url;
        }
        if args.rpc_user.is_some() {
            node.user = args.rpc_user;
        }
        if args.rpc_password.is_some() {
            node.password = args.rpc_password;
        }

        let config = Self {
            telemetry: TelemetryConfig {
                log_level: args.log_level,
                json_logs: args.json_logs,
                log_file: args.log_file,
                ..TelemetryConfig::default()
            },
            node,
            cache: BlockCacheConfig {
                max_entries: args.cache_size,
            },
            ingestor: IngestorConfig {
                poll_interval: Duration::from_secs(args.poll_interval_secs),
                ..IngestorConfig::default()
            },
            retrieval: RetrievalConfig::default(),
            gateway: GatewayConfig {
                host: args.bind_addr.ip(),
                port: args.bind_addr.port(),
                vendor: args.vendor,
                params_base_url: args.params_url,
                ..GatewayConfig::default()
            },
            start_height: args.start_height,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every subsystem's settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node.validate()?;
        self.cache.validate().map_err(ConfigError::Cache)?;
        self.ingestor.validate()?;
        self.retrieval.validate()?;
        self.gateway.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["lightwalletd"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_args(parse(&[])).unwrap();
        assert_eq!(config.gateway.port, 9067);
        assert_eq!(config.cache.max_entries, 40_000);
        assert_eq!(config.ingestor.poll_interval, Duration::from_secs(15));
        assert_eq!(config.node.url, "http://127.0.0.1:8232");
        assert!(config.start_height.is_none());
    }

    #[test]
    fn test_flags_override_zcash_conf() {
        let mut conf = tempfile::NamedTempFile::new().unwrap();
        writeln!(conf, "rpcuser=alice\nrpcpassword=secret\nrpcport=18232").unwrap();

        let path = conf.path().to_string_lossy().to_string();
        let config = RuntimeConfig::from_args(parse(&[
            "--zcash-conf",
            &path,
            "--rpc-user",
            "bob",
            "--rpc-password",
            "hunter2",
        ]))
        .unwrap();
        assert_eq!(config.node.url, "http://127.0.0.1:18232");
        assert_eq!(config.node.user.as_deref(), Some("bob"));
        assert_eq!(config.node.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_missing_zcash_conf_is_an_error() {
        let result = RuntimeConfig::from_args(parse(&["--zcash-conf", "/nonexistent/zcash.conf"]));
        assert!(matches!(result, Err(ConfigError::Node(_))));
    }

    #[test]
    fn test_zero_cache_rejected() {
        let result = RuntimeConfig::from_args(parse(&["--cache-size", "0"]));
        assert!(matches!(result, Err(ConfigError::Cache(_))));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = RuntimeConfig::from_args(parse(&["--poll-interval-secs", "0"]));
        assert!(matches!(result, Err(ConfigError::Ingestor(_))));
    }

    #[test]
    fn test_user_without_password_rejected() {
        let result = RuntimeConfig::from_args(parse(&["--rpc-user", "alice"]));
        assert!(matches!(result, Err(ConfigError::Node(_))));
    }
}
