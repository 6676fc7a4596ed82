//! The assembled server against a fake node, queried over HTTP.

use std::net::SocketAddr;
use std::time::Duration;

use lw_02_node_rpc::NodeRpcConfig;
use lw_05_wallet_gateway::GatewayConfig;
use lwd_runtime::{Lightwalletd, RuntimeConfig};
use serde_json::{json, Value};
use shared_types::hash_to_hex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fake_node::{FakeNode, ACTIVATION};

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), String>>,
}

async fn start(node: &FakeNode) -> Running {
    let url = node.spawn().await;
    let mut config = RuntimeConfig {
        node: NodeRpcConfig::for_testing(url),
        gateway: GatewayConfig::for_testing(),
        ..RuntimeConfig::default()
    };
    config.ingestor.poll_interval = Duration::from_millis(20);
    config.cache.max_entries = 100;

    let runtime = Lightwalletd::build(config).await.unwrap();
    let addr = runtime.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        runtime
            .run(async {
                let _ = stopped.await;
            })
            .await
            .map_err(|e| format!("{:#}", e))
    });
    Running { addr, stop, task }
}

async fn call(addr: SocketAddr, method: &str, params: Value) -> Value {
    reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .json(&json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn wait_for_tip(addr: SocketAddr, height: u64) {
    for _ in 0..200 {
        let response = call(addr, "GetLatestBlock", json!([])).await;
        if response["result"]["height"] == height {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("tip never reached {}", height);
}

#[tokio::test]
async fn test_server_ingests_from_activation_and_serves_wallets() {
    let node = FakeNode::with_chain(6);
    let server = start(&node).await;
    wait_for_tip(server.addr, ACTIVATION + 5).await;

    let response = call(server.addr, "GetBlock", json!([{ "height": ACTIVATION + 2 }])).await;
    assert_eq!(
        response["result"]["hash"],
        hash_to_hex(&node.hash_at(ACTIVATION + 2).unwrap())
    );
    assert_eq!(response["result"]["vtx"].as_array().unwrap().len(), 1);

    let response = call(server.addr, "GetBlock", json!([{ "height": ACTIVATION + 6 }])).await;
    assert_eq!(response["error"]["code"], -32002);

    let response = call(server.addr, "GetLightdInfo", json!([])).await;
    assert_eq!(response["result"]["chain_name"], "regtest");
    assert_eq!(response["result"]["sapling_activation_height"], ACTIVATION);

    let body = reqwest::Client::new()
        .post(format!("http://{}/stream", server.addr))
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "GetBlockRange",
            "params": { "start": { "height": ACTIVATION }, "end": { "height": ACTIVATION + 3 } }
        }))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let heights: Vec<u64> = body
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["result"]["height"].as_u64().unwrap())
        .collect();
    assert_eq!(heights, (ACTIVATION..=ACTIVATION + 3).collect::<Vec<_>>());

    server.stop.send(()).unwrap();
    assert_eq!(server.task.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn test_server_follows_new_blocks_and_reorgs() {
    let node = FakeNode::with_chain(10);
    let server = start(&node).await;
    wait_for_tip(server.addr, ACTIVATION + 9).await;

    node.mine(2);
    wait_for_tip(server.addr, ACTIVATION + 11).await;

    node.fork(ACTIVATION + 7, 8, 1);
    wait_for_tip(server.addr, ACTIVATION + 14).await;

    for height in ACTIVATION + 7..=ACTIVATION + 14 {
        let response = call(server.addr, "GetBlock", json!([{ "height": height }])).await;
        assert_eq!(
            response["result"]["hash"],
            hash_to_hex(&node.hash_at(height).unwrap()),
            "height {}",
            height
        );
    }

    server.stop.send(()).unwrap();
    assert_eq!(server.task.await.unwrap(), Ok(()));
}
