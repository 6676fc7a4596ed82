//! # Runtime Wiring
//!
//! One node client shared by the ingestor, the retrieval API and the
//! gateway; one cache written by the ingestor and read by retrieval.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use lw_01_block_cache::BlockCache;
use lw_02_node_rpc::{ChainInfo, HttpRpcTransport, NodeRpcApi, NodeRpcClient};
use lw_03_chain_ingestor::ChainIngestor;
use lw_04_block_retrieval::BlockRetrievalService;
use lw_05_wallet_gateway::WalletGatewayService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::RuntimeConfig;
use crate::start_height::resolve_start_height;

type Node = NodeRpcClient<HttpRpcTransport>;

/// A wired server, bound and ready to run.
pub struct Lightwalletd {
    ingestor: ChainIngestor<Arc<Node>, Arc<BlockCache>>,
    gateway: WalletGatewayService,
    listener: TcpListener,
    chain: ChainInfo,
}

impl Lightwalletd {
    /// Connect to the node, resolve the start height and bind the gateway.
    ///
    /// Fails when the node cannot report its chain.
    pub async fn build(config: RuntimeConfig) -> Result<Self> {
        let transport =
            HttpRpcTransport::new(&config.node).context("creating node RPC transport")?;
        let node = Arc::new(NodeRpcClient::new(transport));

        let chain = node
            .get_chain_info()
            .await
            .context("querying getblockchaininfo")?;
        let start = resolve_start_height(config.start_height, chain.sapling_activation_height);
        info!(
            chain = %chain.chain_name,
            node_height = chain.block_height,
            start_height = start,
            "Connected to node"
        );

        let cache = Arc::new(BlockCache::from_config(&config.cache));
        let ingestor = ChainIngestor::new(
            Arc::clone(&node),
            Arc::clone(&cache),
            config.ingestor,
            start,
        )?;
        let retrieval = BlockRetrievalService::new(Arc::clone(&node), cache, config.retrieval)?;
        let node_api: Arc<dyn NodeRpcApi> = node;
        let gateway = WalletGatewayService::new(config.gateway, node_api, Arc::new(retrieval))?;
        let listener = gateway.bind().await?;

        Ok(Self {
            ingestor,
            gateway,
            listener,
            chain,
        })
    }

    /// Address the gateway is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Chain facts read at startup.
    pub fn chain(&self) -> &ChainInfo {
        &self.chain
    }

    /// Run until `shutdown` resolves or a subsystem fails.
    ///
    /// A fatal ingestor error (reorg deeper than the ceiling) stops the
    /// gateway too and is returned.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let shutdown_tx = Arc::new(shutdown_tx);

        let ingest_task = {
            let tx = Arc::clone(&shutdown_tx);
            let rx = shutdown_rx.clone();
            let ingestor = self.ingestor;
            tokio::spawn(async move {
                let result = ingestor.run(rx).await;
                if let Err(ref e) = result {
                    error!(error = %e, "Chain ingestor failed");
                    let _ = tx.send(true);
                }
                result
            })
        };

        let gateway_task = {
            let tx = Arc::clone(&shutdown_tx);
            let rx = shutdown_rx.clone();
            let gateway = self.gateway;
            let listener = self.listener;
            tokio::spawn(async move {
                let result = gateway.serve(listener, rx).await;
                if let Err(ref e) = result {
                    error!(error = %e, "Wallet gateway failed");
                    let _ = tx.send(true);
                }
                result
            })
        };

        let mut stopped = shutdown_rx;
        let subsystem_stopped = async move {
            loop {
                if *stopped.borrow_and_update() {
                    break;
                }
                if stopped.changed().await.is_err() {
                    break;
                }
            }
        };
        tokio::select! {
            _ = shutdown => info!("Shutdown requested"),
            _ = subsystem_stopped => {}
        }
        let _ = shutdown_tx.send(true);

        let ingest_result = ingest_task
            .await
            .map_err(|e| anyhow!("ingestor task panicked: {}", e))?;
        let gateway_result = gateway_task
            .await
            .map_err(|e| anyhow!("gateway task panicked: {}", e))?;

        ingest_result.context("chain ingestor stopped")?;
        gateway_result.context("wallet gateway stopped")?;
        info!("Shutdown complete");
        Ok(())
    }
}
