//! Prometheus metrics.
//!
//! All metrics follow the naming convention: `lwd_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramVec, Opts,
    Registry, TextEncoder,
};
use std::time::Instant;

use crate::TelemetryError;

lazy_static! {
    /// Registry every server metric lives in.
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INGESTOR METRICS (Subsystem 3)
    // =========================================================================

    /// Blocks accepted into the cache
    pub static ref BLOCKS_INGESTED: Counter = Counter::new(
        "lwd_ingestor_blocks_ingested_total",
        "Total number of blocks added to the cache"
    ).expect("metric creation failed");

    /// Hash-chain mismatches seen while adding
    pub static ref REORGS_DETECTED: Counter = Counter::new(
        "lwd_ingestor_reorgs_detected_total",
        "Total number of reorgs detected"
    ).expect("metric creation failed");

    /// Failed fetches and failed cache adds
    pub static ref FETCH_FAILURES: Counter = Counter::new(
        "lwd_ingestor_fetch_failures_total",
        "Total number of failed block fetches"
    ).expect("metric creation failed");

    /// Highest cached height
    pub static ref CACHED_TIP: Gauge = Gauge::new(
        "lwd_cache_tip_height",
        "Height of the newest cached block"
    ).expect("metric creation failed");

    // =========================================================================
    // RETRIEVAL METRICS (Subsystem 4)
    // =========================================================================

    /// Blocks handed to callers, by where they came from
    pub static ref BLOCKS_SERVED: CounterVec = CounterVec::new(
        Opts::new("lwd_retrieval_blocks_served_total", "Blocks returned to callers"),
        &["source"]  // source: cache/node
    ).expect("metric creation failed");

    /// Finished range streams
    pub static ref RANGE_STREAMS: CounterVec = CounterVec::new(
        Opts::new("lwd_retrieval_range_streams_total", "Block range streams"),
        &["outcome"]  // outcome: complete/error/cancelled
    ).expect("metric creation failed");

    // =========================================================================
    // GATEWAY METRICS (Subsystem 5)
    // =========================================================================

    /// Wallet requests
    pub static ref REQUESTS: CounterVec = CounterVec::new(
        Opts::new("lwd_gateway_requests_total", "Wallet API requests"),
        &["method", "outcome"]  // outcome: ok/error
    ).expect("metric creation failed");

    /// Wallet request latency
    pub static ref REQUEST_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "lwd_gateway_request_duration_seconds",
            "Time spent handling wallet requests"
        ).buckets(exponential_buckets(0.0005, 2.0, 15).expect("valid buckets")),
        &["method"]
    ).expect("metric creation failed");

    /// Relayed transactions
    pub static ref TRANSACTIONS_SENT: CounterVec = CounterVec::new(
        Opts::new("lwd_gateway_transactions_sent_total", "Transactions relayed to the node"),
        &["result"]  // result: accepted/rejected
    ).expect("metric creation failed");

    /// Parameter file redirects
    pub static ref PARAMS_DOWNLOADS: CounterVec = CounterVec::new(
        Opts::new("lwd_gateway_params_downloads_total", "Proving parameter downloads"),
        &["param"]  // param: sapling-spend/sapling-output/sprout
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Subsystem errors by type
    pub static ref SUBSYSTEM_ERRORS: CounterVec = CounterVec::new(
        Opts::new("lwd_subsystem_errors_total", "Errors by subsystem and type"),
        &["subsystem", "error_type"]
    ).expect("metric creation failed");
}

fn collectors() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BLOCKS_INGESTED.clone()),
        Box::new(REORGS_DETECTED.clone()),
        Box::new(FETCH_FAILURES.clone()),
        Box::new(CACHED_TIP.clone()),
        Box::new(BLOCKS_SERVED.clone()),
        Box::new(RANGE_STREAMS.clone()),
        Box::new(REQUESTS.clone()),
        Box::new(REQUEST_DURATION.clone()),
        Box::new(TRANSACTIONS_SENT.clone()),
        Box::new(PARAMS_DOWNLOADS.clone()),
        Box::new(SUBSYSTEM_ERRORS.clone()),
    ]
}

/// Register every server metric with [`REGISTRY`]. Idempotent; returns how
/// many collectors were newly registered.
pub fn register_metrics() -> Result<usize, TelemetryError> {
    let mut added = 0;
    for collector in collectors() {
        match REGISTRY.register(collector) {
            Ok(()) => added += 1,
            Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(added)
}

/// Prometheus text exposition of [`REGISTRY`], served at `/metrics`.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let mut out = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut out)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(out).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes the elapsed seconds into a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    started: Instant,
}

impl HistogramTimer {
    /// Starts timing now.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            started: Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.started.elapsed().as_secs_f64());
    }
}
