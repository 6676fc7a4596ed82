//! # LW Telemetry
//!
//! Logging and metrics shared by every subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lw_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig {
//!     json_logs: true,
//!     ..TelemetryConfig::default()
//! })?;
//! ```
//!
//! `RUST_LOG`, when set, overrides [`TelemetryConfig::log_level`].
//!
//! ## Metrics
//!
//! | Metric | Kind | Labels |
//! |--------|------|--------|
//! | `lwd_ingestor_blocks_ingested_total` | counter | |
//! | `lwd_ingestor_reorgs_detected_total` | counter | |
//! | `lwd_ingestor_fetch_failures_total` | counter | |
//! | `lwd_cache_tip_height` | gauge | |
//! | `lwd_retrieval_*` | counters | `source` / `outcome` |
//! | `lwd_gateway_*` | counters, histogram | `method`, `outcome`, `file` |
//! | `lwd_subsystem_errors_total` | counter | `subsystem`, `error_type` |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BLOCKS_INGESTED,
    BLOCKS_SERVED, CACHED_TIP, FETCH_FAILURES, PARAMS_DOWNLOADS, RANGE_STREAMS, REORGS_DETECTED,
    REQUESTS, REQUEST_DURATION, SUBSYSTEM_ERRORS, TRANSACTIONS_SENT,
};

use thiserror::Error;

/// Failures while setting up logging or metrics.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    LoggingInit(String),

    /// A metric could not be registered or encoded.
    #[error("metrics failure: {0}")]
    MetricsInit(String),

    /// The configuration is unusable.
    #[error("bad telemetry config: {0}")]
    Config(String),
}

/// Install logging and register metrics.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let registered = register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        metrics = registered,
        json_logs = config.json_logs,
        log_file = ?config.log_file,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service: config.service_name.clone(),
    })
}

/// Logs process shutdown when dropped at the end of `main`.
pub struct TelemetryGuard {
    service: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Telemetry shut down");
    }
}

/// Record an error against a subsystem.
#[macro_export]
macro_rules! record_error {
    ($subsystem:expr, $error_type:expr) => {
        $crate::SUBSYSTEM_ERRORS
            .with_label_values(&[$subsystem, $error_type])
            .inc()
    };
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new($histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_macro() {
        record_error!("ingestor", "fetch");
        assert!(
            SUBSYSTEM_ERRORS
                .with_label_values(&["ingestor", "fetch"])
                .get()
                >= 1.0
        );
    }
}
