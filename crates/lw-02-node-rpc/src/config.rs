//! # Node RPC Configuration
//!
//! Endpoint and credentials for the full node. Can be read from a
//! `zcash.conf` style file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::NodeRpcError;

/// Default zcashd RPC port on mainnet.
pub const MAINNET_RPC_PORT: u16 = 8232;
/// Default zcashd RPC port on testnet.
pub const TESTNET_RPC_PORT: u16 = 18232;

/// Node RPC configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRpcConfig {
    /// JSON-RPC endpoint, e.g. `http://127.0.0.1:8232`.
    pub url: String,
    /// Basic-auth user.
    pub user: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for NodeRpcConfig {
    fn default() -> Self {
        Self {
            url: format!("http://127.0.0.1:{}", MAINNET_RPC_PORT),
            user: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl NodeRpcConfig {
    /// Create a config for testing (short timeouts).
    pub fn for_testing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: Some("test".to_string()),
            password: Some("test".to_string()),
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        }
    }

    /// Read `rpcuser`, `rpcpassword`, `rpcbind`, `rpcport` and `testnet`
    /// from a zcash.conf file.
    pub fn from_conf_file(path: &Path) -> Result<Self, NodeRpcError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| NodeRpcError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_conf_str(&text))
    }

    /// Parse zcash.conf contents.
    pub fn from_conf_str(text: &str) -> Self {
        let mut config = Self::default();
        let mut host = "127.0.0.1".to_string();
        let mut port = None;
        let mut testnet = false;

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "rpcuser" => config.user = Some(value.to_string()),
                "rpcpassword" => config.password = Some(value.to_string()),
                "rpcbind" => host = value.to_string(),
                "rpcport" => port = value.parse::<u16>().ok(),
                "testnet" => testnet = value == "1",
                _ => {}
            }
        }

        let port = port.unwrap_or(if testnet {
            TESTNET_RPC_PORT
        } else {
            MAINNET_RPC_PORT
        });
        config.url = format!("http://{}:{}", host, port);
        config
    }

    /// Check the endpoint looks like an HTTP URL.
    pub fn validate(&self) -> Result<(), NodeRpcError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(NodeRpcError::Config(format!(
                "rpc url must be http(s): {}",
                self.url
            )));
        }
        if self.user.is_some() != self.password.is_some() {
            return Err(NodeRpcError::Config(
                "rpc user and password must be set together".to_string(),
            ));
        }
        Ok(())
    }
}
