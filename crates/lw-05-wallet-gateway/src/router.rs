use crate::domain::config::GatewayConfig;
use crate::domain::error::ApiError;
use crate::domain::methods::{method_kind, MethodKind};
use crate::rpc::{to_json, ResponseStream, WalletRpc};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Method handlers.
    pub rpc: Arc<WalletRpc>,
    /// Limits and CORS settings.
    pub config: Arc<GatewayConfig>,
}

/// Route a unary JSON-RPC method to its handler.
pub async fn route_method(
    state: &AppState,
    method: &str,
    params: Option<&serde_json::Value>,
) -> Result<serde_json::Value, ApiError> {
    let rpc = &state.rpc;
    match method {
        "GetLatestBlock" => to_json(&rpc.get_latest_block()?),
        "GetBlock" => to_json(&rpc.get_block(parse_param(params, 0)?).await?),
        "GetTransaction" => to_json(&rpc.get_transaction(parse_param(params, 0)?).await?),
        "SendTransaction" => to_json(&rpc.send_transaction(parse_param(params, 0)?).await?),
        "GetLightdInfo" => to_json(&rpc.get_lightd_info().await?),
        _ if method_kind(method) == Some(MethodKind::Streaming) => Err(ApiError::invalid_request(
            format!("{} is a streaming method, use POST /stream", method),
        )),
        _ => Err(ApiError::method_not_found(method)),
    }
}

/// Route a streaming JSON-RPC method to its handler.
pub async fn route_stream(
    state: &AppState,
    method: &str,
    params: Option<&serde_json::Value>,
) -> Result<ResponseStream, ApiError> {
    let rpc = &state.rpc;
    match method {
        "GetBlockRange" => Ok(rpc.get_block_range(parse_param(params, 0)?)),
        "GetAddressTxids" => rpc.get_address_txids(parse_param(params, 0)?).await,
        "GetUtxos" => rpc.get_utxos(parse_param(params, 0)?).await,
        _ if method_kind(method) == Some(MethodKind::Unary) => Err(ApiError::invalid_request(
            format!("{} is a unary method, use POST /", method),
        )),
        _ => Err(ApiError::method_not_found(method)),
    }
}

/// Parse a required parameter from JSON-RPC params.
///
/// Params may be an array or, for index 0, a bare object.
pub fn parse_param<T: serde::de::DeserializeOwned>(
    params: Option<&serde_json::Value>,
    index: usize,
) -> Result<T, ApiError> {
    let param = params
        .and_then(|p| {
            if p.is_array() {
                p.get(index)
            } else if index == 0 {
                Some(p)
            } else {
                None
            }
        })
        .ok_or_else(|| ApiError::invalid_params(format!("missing parameter at index {}", index)))?;

    serde_json::from_value(param.clone()).map_err(|e| {
        ApiError::invalid_params(format!("invalid parameter at index {}: {}", index, e))
    })
}
