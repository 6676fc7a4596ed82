//! Wallet gateway service: HTTP server and request dispatch.
//!
//! `POST /` answers unary methods with one JSON-RPC response (or an array
//! for batches). `POST /stream` answers streaming methods with one response
//! object per line.

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ApiError, GatewayError};
use crate::middleware::create_cors_layer;
use crate::ports::{BlockRetrievalApi, NodeRpcApi};
use crate::router::{route_method, route_stream, AppState};
use crate::rpc::WalletRpc;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, StreamExt};
use lw_telemetry::{record_error, time_histogram, PARAMS_DOWNLOADS, REQUESTS, REQUEST_DURATION};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Proving parameter files served by redirect.
pub const PARAM_FILES: [&str; 3] = [
    "sapling-spend.params",
    "sapling-output.params",
    "sprout-groth16.params",
];

const NDJSON: &str = "application/x-ndjson";

/// Wallet gateway service
pub struct WalletGatewayService {
    config: Arc<GatewayConfig>,
    rpc: Arc<WalletRpc>,
}

impl WalletGatewayService {
    /// Create the service over the node client and retrieval API.
    pub fn new(
        config: GatewayConfig,
        node: Arc<dyn NodeRpcApi>,
        retrieval: Arc<dyn BlockRetrievalApi>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        let rpc = Arc::new(WalletRpc::new(&config, node, retrieval));
        Ok(Self {
            config: Arc::new(config),
            rpc,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let state = AppState {
            rpc: Arc::clone(&self.rpc),
            config: Arc::clone(&self.config),
        };

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors))
            .layer(DefaultBodyLimit::max(self.config.max_request_size));

        Router::new()
            .route("/", post(handle_json_rpc))
            .route("/stream", post(handle_stream))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_handler))
            .route("/params/:file", get(params_handler))
            .layer(middleware)
            .with_state(state)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))
    }

    /// Serve on `listener` until `shutdown` turns true or its sender drops.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let local: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local, "Wallet gateway listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown.borrow_and_update() {
                        break;
                    }
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))?;

        info!("Wallet gateway stopped");
        Ok(())
    }

    /// Bind and serve.
    pub async fn start(self, shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Handle unary JSON-RPC request or batch
async fn handle_json_rpc(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(error_response(None, &ApiError::parse_error(e.to_string()))),
            );
        }
    };

    let response = match request {
        Value::Array(requests) => {
            if requests.is_empty() || requests.len() > state.config.max_batch_size {
                let err = ApiError::invalid_request(format!(
                    "batch must hold 1 to {} requests",
                    state.config.max_batch_size
                ));
                return (StatusCode::BAD_REQUEST, Json(error_response(None, &err)));
            }
            let mut responses = Vec::with_capacity(requests.len());
            for req in &requests {
                responses.push(process_single_request(&state, req).await);
            }
            Value::Array(responses)
        }
        single => process_single_request(&state, &single).await,
    };

    (StatusCode::OK, Json(response))
}

/// Process a single unary JSON-RPC request
async fn process_single_request(state: &AppState, request: &Value) -> Value {
    let (id, method, params) = match parse_envelope(request) {
        Ok(envelope) => envelope,
        Err(err) => return error_response(None, &err),
    };

    let result = {
        let _timer = time_histogram!(&REQUEST_DURATION.with_label_values(&[metric_label(&method)]));
        route_method(state, &method, params).await
    };
    record_outcome(&method, result.as_ref().err());

    match result {
        Ok(value) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": value
        }),
        Err(e) => error_response(id, &e),
    }
}

/// Handle streaming JSON-RPC request
async fn handle_stream(State(state): State<AppState>, body: String) -> Response {
    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => return ndjson_single(error_response(None, &ApiError::parse_error(e.to_string()))),
    };
    let (id, method, params) = match parse_envelope(&request) {
        Ok(envelope) => envelope,
        Err(err) => return ndjson_single(error_response(None, &err)),
    };

    let opened = {
        let _timer = time_histogram!(&REQUEST_DURATION.with_label_values(&[metric_label(&method)]));
        route_stream(&state, &method, params).await
    };
    record_outcome(&method, opened.as_ref().err());

    let items = match opened {
        Ok(items) => items,
        Err(e) => return ndjson_single(error_response(id, &e)),
    };

    let lines = items.map(move |item| {
        let response = match item {
            Ok(value) => json!({ "jsonrpc": "2.0", "id": id, "result": value }),
            Err(e) => {
                warn!(error = %e, "Stream ended with error");
                error_response(id.clone(), &e)
            }
        };
        Ok::<_, Infallible>(format!("{}\n", response))
    });
    ndjson(Body::from_stream(lines))
}

/// Validate a request object and pull out id, method and params.
fn parse_envelope(request: &Value) -> Result<(Option<Value>, String, Option<&Value>), ApiError> {
    if !request.is_object() {
        return Err(ApiError::invalid_request("request must be an object"));
    }
    let id = request.get("id").cloned();

    if let Some(ref id_val) = id {
        if id_val.is_null() {
            return Err(ApiError::invalid_request(
                "null id (notifications not supported)",
            ));
        }
        if let Some(s) = id_val.as_str() {
            if s.is_empty() {
                return Err(ApiError::invalid_request("empty string id"));
            }
            if s.len() > 256 {
                return Err(ApiError::invalid_request(
                    "id string too long (max 256 chars)",
                ));
            }
        }
        if !id_val.is_string() && !id_val.is_number() {
            return Err(ApiError::invalid_request("id must be string or number"));
        }
    }

    let method = request
        .get("method")
        .and_then(|m| m.as_str())
        .ok_or_else(|| ApiError::invalid_request("missing method"))?;

    Ok((id, method.to_string(), request.get("params")))
}

fn error_response(id: Option<Value>, error: &ApiError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}

/// Unknown method names share one label.
fn metric_label(method: &str) -> &str {
    if crate::domain::methods::method_kind(method).is_some() {
        method
    } else {
        "unknown"
    }
}

fn record_outcome(method: &str, error: Option<&ApiError>) {
    let outcome = error.map(ApiError::kind).unwrap_or("ok");
    REQUESTS
        .with_label_values(&[metric_label(method), outcome])
        .inc();
    if let Some(e) = error {
        if e.kind() == "internal" || e.kind() == "node" {
            record_error!("gateway", e.kind());
        }
    }
}

fn ndjson(body: Body) -> Response {
    ([(header::CONTENT_TYPE, NDJSON)], body).into_response()
}

fn ndjson_single(response: Value) -> Response {
    let line = format!("{}\n", response);
    ndjson(Body::from_stream(stream::once(async move {
        Ok::<_, Infallible>(line)
    })))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "wallet-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus text exposition
async fn metrics_handler() -> Response {
    match lw_telemetry::encode_metrics() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Redirect proving parameter downloads to the mirror.
async fn params_handler(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let Some(param) = PARAM_FILES.iter().find(|p| **p == file) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    PARAMS_DOWNLOADS.with_label_values(&[*param]).inc();
    let location = format!(
        "{}/{}",
        state.config.params_base_url.trim_end_matches('/'),
        param
    );
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lw_01_block_cache::{BlockCache, BlockCacheApi};
    use lw_02_node_rpc::{MockTransport, NodeRpcClient};
    use lw_04_block_retrieval::{BlockRetrievalService, RetrievalConfig};
    use shared_types::{ChainBuilder, CompactBlock, MockBlockSource};
    use tower::ServiceExt;

    fn gateway(transport: Arc<MockTransport>, cached: &[CompactBlock]) -> WalletGatewayService {
        let cache = Arc::new(BlockCache::new(100));
        for block in cached {
            cache.add(block.height, block).unwrap();
        }
        let source = Arc::new(MockBlockSource::with_blocks(cached.to_vec()));
        let retrieval =
            BlockRetrievalService::new(source, cache, RetrievalConfig::for_testing()).unwrap();
        WalletGatewayService::new(
            GatewayConfig::for_testing(),
            Arc::new(NodeRpcClient::new(transport)),
            Arc::new(retrieval),
        )
        .unwrap()
    }

    async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(router: Router, uri: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_unary_get_latest_block() {
        let blocks = ChainBuilder::new(3).chain(200, 4);
        let router = gateway(Arc::new(MockTransport::new()), &blocks).router();
        let (status, body) = post(
            router,
            "/",
            json!({ "jsonrpc": "2.0", "id": 1, "method": "GetLatestBlock" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["height"], 203);
    }

    #[tokio::test]
    async fn test_unary_error_shape() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let (_, body) = post(
            router,
            "/",
            json!({ "jsonrpc": "2.0", "id": "a", "method": "GetBlock", "params": [{}] }),
        )
        .await;
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["id"], "a");
        assert_eq!(response["error"]["code"], -32602);
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("request for unspecified identifier"));
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn test_parse_error_is_bad_request() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_request() {
        let blocks = ChainBuilder::new(3).chain(10, 2);
        let router = gateway(Arc::new(MockTransport::new()), &blocks).router();
        let (_, body) = post(
            router,
            "/",
            json!([
                { "jsonrpc": "2.0", "id": 1, "method": "GetLatestBlock" },
                { "jsonrpc": "2.0", "id": 2, "method": "NoSuchMethod" },
                { "jsonrpc": "2.0", "id": null, "method": "GetLatestBlock" }
            ]),
        )
        .await;
        let responses: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["height"], 11);
        assert_eq!(responses[1]["error"]["code"], -32601);
        assert_eq!(responses[2]["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_streaming_method_on_unary_endpoint() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let (_, body) = post(
            router,
            "/",
            json!({ "jsonrpc": "2.0", "id": 1, "method": "GetBlockRange" }),
        )
        .await;
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_stream_block_range_with_terminal_error() {
        let blocks = ChainBuilder::new(3).chain(100, 3);
        let router = gateway(Arc::new(MockTransport::new()), &blocks).router();
        let (status, body) = post(
            router,
            "/stream",
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "GetBlockRange",
                "params": { "start": { "height": 100 }, "end": { "height": 105 } }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let lines: Vec<Value> = body
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        for (i, line) in lines[..3].iter().enumerate() {
            assert_eq!(line["id"], 7);
            assert_eq!(line["result"]["height"], 100 + i as u64);
        }
        assert_eq!(lines[3]["error"]["code"], -32002);
    }

    #[tokio::test]
    async fn test_stream_rejects_bad_address() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let (_, body) = post(
            router,
            "/stream",
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "GetUtxos",
                "params": { "address": "zs1nope" }
            }),
        )
        .await;
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 1);
        let response: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_health() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let response = get(router, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        lw_telemetry::register_metrics().unwrap();
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let response = get(router, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_params_redirect() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let response = get(router, "/params/sapling-spend.params").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://z.cash/downloads/sapling-spend.params"
        );
    }

    #[tokio::test]
    async fn test_params_unknown_file() {
        let router = gateway(Arc::new(MockTransport::new()), &[]).router();
        let response = get(router, "/params/evil.params").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let service = gateway(Arc::new(MockTransport::new()), &[]);
        let listener = service.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(service.serve(listener, shutdown_rx));

        let health: Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "healthy");

        shutdown_tx.send(true).unwrap();
        assert!(server.await.unwrap().is_ok());
    }
}
