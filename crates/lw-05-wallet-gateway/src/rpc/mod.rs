//! Wallet RPC method handlers.
//!
//! Unary handlers return typed results; streaming handlers return a
//! [`ResponseStream`] that yields JSON values and ends after the first error.

pub mod blocks;
pub mod info;
pub mod transactions;

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::Serialize;

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ApiError, ApiResult};
use crate::ports::{BlockRetrievalApi, NodeRpcApi};

/// Items of a streaming method, already rendered as JSON.
pub type ResponseStream = BoxStream<'static, ApiResult<serde_json::Value>>;

/// All wallet RPC handlers
pub struct WalletRpc {
    node: Arc<dyn NodeRpcApi>,
    retrieval: Arc<dyn BlockRetrievalApi>,
    vendor: String,
    stream_timeout: Duration,
}

impl WalletRpc {
    /// Create the handlers over the node client and the retrieval API.
    pub fn new(
        config: &GatewayConfig,
        node: Arc<dyn NodeRpcApi>,
        retrieval: Arc<dyn BlockRetrievalApi>,
    ) -> Self {
        Self {
            node,
            retrieval,
            vendor: config.vendor.clone(),
            stream_timeout: config.stream_timeout,
        }
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Yield items up to and including the first error.
///
/// The inner stream is dropped, not polled again, once an error is yielded,
/// so no further node calls are issued.
pub(crate) fn stop_after_error<S>(stream: S) -> ResponseStream
where
    S: Stream<Item = ApiResult<serde_json::Value>> + Send + 'static,
{
    stream::unfold(Some(stream.boxed()), |inner| async move {
        let mut inner = inner?;
        let item = inner.next().await?;
        let rest = if item.is_err() { None } else { Some(inner) };
        Some((item, rest))
    })
    .boxed()
}
