//! A zcashd stand-in speaking just enough JSON-RPC for the server.
//!
//! Serves `getblockchaininfo` and `getblock <h> 0` from a mutable chain of
//! raw blocks; heights past the end answer `-8`.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use lw_02_node_rpc::parser::fixtures::{raw_chain, RawBlock};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::{BlockHeight, Hash};

/// Sapling activation the fake node reports.
pub const ACTIVATION: BlockHeight = 100;

/// Shared, mutable node state.
#[derive(Clone, Default)]
pub struct FakeNode {
    blocks: Arc<Mutex<Vec<RawBlock>>>,
}

impl FakeNode {
    /// A node whose chain is `count` blocks starting at [`ACTIVATION`].
    pub fn with_chain(count: usize) -> Self {
        let node = Self::default();
        *node.blocks.lock() = raw_chain(ACTIVATION, count, [0u8; 32], 0);
        node
    }

    /// Highest height served.
    pub fn tip(&self) -> BlockHeight {
        ACTIVATION + self.blocks.lock().len() as u64 - 1
    }

    /// Hash of the block at `height`.
    pub fn hash_at(&self, height: BlockHeight) -> Option<Hash> {
        let index = height.checked_sub(ACTIVATION)? as usize;
        self.blocks.lock().get(index).map(|b| b.hash)
    }

    /// Replace everything from `fork_height` with `count` blocks of a
    /// competing branch.
    pub fn fork(&self, fork_height: BlockHeight, count: usize, salt: u32) {
        let mut blocks = self.blocks.lock();
        let keep = (fork_height - ACTIVATION) as usize;
        blocks.truncate(keep);
        let parent = blocks.last().map(|b| b.hash).unwrap_or([0u8; 32]);
        blocks.extend(raw_chain(fork_height, count, parent, salt));
    }

    /// Append `count` blocks to the current tip.
    pub fn mine(&self, count: usize) {
        let mut blocks = self.blocks.lock();
        let start = ACTIVATION + blocks.len() as u64;
        let parent = blocks.last().map(|b| b.hash).unwrap_or([0u8; 32]);
        blocks.extend(raw_chain(start, count, parent, 0));
    }

    /// Serve on an ephemeral port, returning the URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/", post(handle))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn block_hex(&self, height: BlockHeight) -> Option<String> {
        let index = height.checked_sub(ACTIVATION)? as usize;
        self.blocks.lock().get(index).map(RawBlock::hex)
    }
}

async fn handle(State(node): State<FakeNode>, Json(body): Json<Value>) -> Json<Value> {
    let id = body.get("id").cloned().unwrap_or(Value::Null);
    let params = body.get("params").cloned().unwrap_or(json!([]));
    let reply = match body.get("method").and_then(Value::as_str) {
        Some("getblockchaininfo") => Ok(json!({
            "chain": "regtest",
            "blocks": node.tip(),
            "upgrades": { "76b809bb": { "activationheight": ACTIVATION } },
            "consensus": { "nextblock": "76b809bb" }
        })),
        Some("getblock") => {
            let height = params[0]
                .as_str()
                .and_then(|h| h.parse::<BlockHeight>().ok())
                .unwrap_or(u64::MAX);
            node.block_hex(height)
                .map(Value::String)
                .ok_or((-8, "Block height out of range"))
        }
        _ => Err((-32601, "Method not found")),
    };
    match reply {
        Ok(result) => Json(json!({ "result": result, "error": null, "id": id })),
        Err((code, message)) => Json(json!({
            "result": null,
            "error": { "code": code, "message": message },
            "id": id
        })),
    }
}
