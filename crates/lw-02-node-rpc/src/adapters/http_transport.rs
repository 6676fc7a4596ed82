//! JSON-RPC over HTTP to zcashd.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::NodeRpcConfig;
use crate::domain::{NodeRpcError, RpcFailure};
use crate::ports::RpcTransport;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// reqwest-backed JSON-RPC transport with optional basic auth.
pub struct HttpRpcTransport {
    client: Client,
    url: String,
    credentials: Option<(String, String)>,
    request_id: AtomicU64,
}

impl HttpRpcTransport {
    /// Build a transport from configuration.
    pub fn new(config: &NodeRpcConfig) -> Result<Self, NodeRpcError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| NodeRpcError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            credentials: config.user.clone().zip(config.password.clone()),
            request_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this transport calls.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Turn the `error` member into a failure. zcashd sends an object; some
/// proxies flatten it to a `"<code>: <message>"` string.
fn failure_from_value(error: Value) -> RpcFailure {
    match error {
        Value::String(raw) => RpcFailure::from_raw(&raw),
        Value::Object(ref map) => {
            let code = map.get("code").and_then(Value::as_i64);
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match code {
                Some(code) => RpcFailure::new(code, message),
                None => RpcFailure::from_raw(&error.to_string()),
            }
        }
        other => RpcFailure::from_raw(&other.to_string()),
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, NodeRpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "1.0",
            id: self.next_id(),
            method,
            params,
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                NodeRpcError::Transport(format!("cannot connect to {}", self.url))
            } else {
                NodeRpcError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NodeRpcError::Transport(e.to_string()))?;

        // zcashd answers RPC errors with HTTP 500 and a JSON body, so only
        // give up on the status when the body is not an envelope.
        let envelope: JsonRpcResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(NodeRpcError::Transport(format!("HTTP {} from node", status)));
            }
            Err(e) => return Err(NodeRpcError::Decode(format!("{}: {}", method, e))),
        };

        match envelope.error {
            Some(error) if !error.is_null() => {
                let failure = failure_from_value(error);
                debug!(method, code = failure.code, message = %failure.message, "Node returned error");
                Err(NodeRpcError::Rpc(failure))
            }
            _ => Ok(envelope.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    async fn fake_node(body: Json<Value>) -> (StatusCode, Json<Value>) {
        let id = body.get("id").cloned().unwrap_or(Value::Null);
        match body.get("method").and_then(Value::as_str) {
            Some("getblockcount") => (
                StatusCode::OK,
                Json(json!({ "result": 42, "error": null, "id": id })),
            ),
            Some("getblock") => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "result": null,
                    "error": { "code": -8, "message": "Block height out of range" },
                    "id": id
                })),
            ),
            Some("flattened") => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "result": null, "error": "-28: Loading block index...", "id": id })),
            ),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "result": null,
                    "error": { "code": -32601, "message": "Method not found" },
                    "id": id
                })),
            ),
        }
    }

    async fn spawn_fake_node() -> String {
        let app = Router::new().route("/", post(fake_node));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_successful_call_returns_result() {
        let url = spawn_fake_node().await;
        let transport = HttpRpcTransport::new(&NodeRpcConfig::for_testing(url)).unwrap();
        let result = transport.call("getblockcount", vec![]).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn test_error_object_becomes_rpc_failure() {
        let url = spawn_fake_node().await;
        let transport = HttpRpcTransport::new(&NodeRpcConfig::for_testing(url)).unwrap();
        let err = transport
            .call("getblock", vec![json!("999999"), json!(0)])
            .await
            .unwrap_err();
        assert!(err.is_not_yet_available());
    }

    #[tokio::test]
    async fn test_flattened_error_string_is_parsed() {
        let url = spawn_fake_node().await;
        let transport = HttpRpcTransport::new(&NodeRpcConfig::for_testing(url)).unwrap();
        let err = transport.call("flattened", vec![]).await.unwrap_err();
        assert_eq!(err, NodeRpcError::Rpc(RpcFailure::new(-28, "Loading block index...")));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let transport =
            HttpRpcTransport::new(&NodeRpcConfig::for_testing("http://127.0.0.1:1")).unwrap();
        let err = transport.call("getblockcount", vec![]).await.unwrap_err();
        assert!(matches!(err, NodeRpcError::Transport(_)));
    }

    #[test]
    fn test_bad_url_rejected() {
        let config = NodeRpcConfig::for_testing("ftp://node");
        assert!(matches!(
            HttpRpcTransport::new(&config),
            Err(NodeRpcError::Config(_))
        ));
    }
}
