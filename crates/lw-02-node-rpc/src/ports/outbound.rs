//! # Outbound Ports
//!
//! The JSON-RPC wire and the block parser.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared_types::{BlockHeight, CompactBlock};

use crate::domain::{NodeRpcError, ParseError};

/// Raw JSON-RPC call - outbound port.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Invoke `method` with positional `params`, returning the `result` value.
    ///
    /// Node-reported errors come back as [`NodeRpcError::Rpc`].
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, NodeRpcError>;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for std::sync::Arc<T> {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, NodeRpcError> {
        (**self).call(method, params).await
    }
}

/// Raw block bytes to compact block - outbound port.
pub trait BlockParser: Send + Sync {
    /// Parse a full serialized block fetched for `height`.
    ///
    /// Trailing bytes after the last transaction are an error.
    fn parse(&self, raw: &[u8], height: BlockHeight) -> Result<CompactBlock, ParseError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// A recorded call to [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Method name.
    pub method: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

/// Scripted transport: answers calls from a queue of canned responses.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, NodeRpcError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result.
    pub fn respond(&self, result: Value) -> &Self {
        self.responses.lock().push_back(Ok(result));
        self
    }

    /// Queue an error.
    pub fn fail(&self, error: NodeRpcError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, NodeRpcError> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            params,
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(NodeRpcError::Transport(format!("no scripted response for {}", method))))
    }
}
