//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::error::GatewayError;

/// Port wallets connect to by default.
pub const DEFAULT_PORT: u16 = 9067;

/// Where parameter downloads are redirected.
pub const DEFAULT_PARAMS_BASE_URL: &str = "https://z.cash/downloads";

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
    /// Vendor label reported by `GetLightdInfo`
    pub vendor: String,
    /// Base URL for `/params/<file>` redirects
    pub params_base_url: String,
    /// Time budget for address streams
    pub stream_timeout: Duration,
    /// Maximum request body in bytes
    pub max_request_size: usize,
    /// Maximum entries in a batch request
    pub max_batch_size: usize,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            vendor: "lightwalletd".to_string(),
            params_base_url: DEFAULT_PARAMS_BASE_URL.to_string(),
            stream_timeout: Duration::from_secs(30),
            max_request_size: 4 * 1024 * 1024,
            max_batch_size: 100,
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Loopback on an ephemeral port.
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            stream_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.max_request_size == 0 {
            return Err(GatewayError::Config(
                "max_request_size cannot be 0".into(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(GatewayError::Config("max_batch_size cannot be 0".into()));
        }
        if self.stream_timeout.is_zero() {
            return Err(GatewayError::Config("stream_timeout cannot be 0".into()));
        }
        if !self.params_base_url.starts_with("http://")
            && !self.params_base_url.starts_with("https://")
        {
            return Err(GatewayError::Config(format!(
                "params_base_url must be an http(s) URL, got {}",
                self.params_base_url
            )));
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Apply a restrictive CORS policy; permissive when false
    pub enabled: bool,
    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            max_age: 3600,
        }
    }
}
