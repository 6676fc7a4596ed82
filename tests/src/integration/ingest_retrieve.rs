//! Ingestor feeding the cache, retrieval reading it.

use std::sync::Arc;

use futures::StreamExt;
use lw_01_block_cache::{BlockCache, BlockCacheApi};
use lw_03_chain_ingestor::{ChainIngestor, IngestorConfig, RoundOutcome};
use lw_04_block_retrieval::{
    BlockRetrievalApi, BlockRetrievalService, RetrievalConfig, RetrievalError,
};
use shared_types::{ChainBuilder, MockBlockSource};
use tokio::sync::watch;

struct Harness {
    source: Arc<MockBlockSource>,
    cache: Arc<BlockCache>,
    ingestor: ChainIngestor<Arc<MockBlockSource>, Arc<BlockCache>>,
    retrieval: BlockRetrievalService<MockBlockSource, BlockCache>,
    stop: watch::Receiver<bool>,
    _stop_tx: watch::Sender<bool>,
}

fn harness(source: MockBlockSource, cache_size: u64, start: u64) -> Harness {
    let source = Arc::new(source);
    let cache = Arc::new(BlockCache::new(cache_size));
    let ingestor = ChainIngestor::new(
        Arc::clone(&source),
        Arc::clone(&cache),
        IngestorConfig::for_testing(),
        start,
    )
    .unwrap();
    let retrieval = BlockRetrievalService::new(
        Arc::clone(&source),
        Arc::clone(&cache),
        RetrievalConfig::for_testing(),
    )
    .unwrap();
    let (stop_tx, stop) = watch::channel(false);
    Harness {
        source,
        cache,
        ingestor,
        retrieval,
        stop,
        _stop_tx: stop_tx,
    }
}

#[tokio::test]
async fn test_ingested_chain_is_served_with_tip_policy() {
    let chain = ChainBuilder::new(0).chain(100, 20);
    let mut h = harness(MockBlockSource::with_blocks(chain.clone()), 10, 100);

    let outcome = h.ingestor.poll_round(&h.stop).await.unwrap();
    assert_eq!(outcome, RoundOutcome::CaughtUp);
    assert_eq!(h.cache.window(), Some((110, 119)));
    assert_eq!(h.retrieval.get_latest_block().unwrap(), 119);

    // Resident: no node traffic.
    let fetches = h.source.fetch_count();
    let block = h.retrieval.get_block(115).await.unwrap();
    assert_eq!(block.hash, chain[15].hash);
    assert_eq!(h.source.fetch_count(), fetches);

    // Evicted: fetched from the node, cache untouched.
    let block = h.retrieval.get_block(105).await.unwrap();
    assert_eq!(block.hash, chain[5].hash);
    assert_eq!(h.source.fetch_count(), fetches + 1);
    assert_eq!(h.cache.window(), Some((110, 119)));

    // Beyond the tip: refused even though it may exist on the node.
    h.source.extend(ChainBuilder::new(0).extend(&chain[19], 1));
    assert_eq!(
        h.retrieval.get_block(120).await,
        Err(RetrievalError::NewerThanTip {
            height: 120,
            tip: 119
        })
    );
}

#[tokio::test]
async fn test_reorg_is_followed_to_the_new_branch() {
    let main = ChainBuilder::new(0).chain(100, 10);
    let mut h = harness(MockBlockSource::with_blocks(main.clone()), 50, 100);
    h.ingestor.poll_round(&h.stop).await.unwrap();
    assert_eq!(h.retrieval.get_latest_block().unwrap(), 109);

    // Node switches to a branch forking after 104 and grows past our tip.
    let fork = ChainBuilder::new(1).extend(&main[4], 8);
    h.source.truncate(105);
    h.source.extend(fork.clone());

    h.ingestor.poll_round(&h.stop).await.unwrap();

    assert_eq!(h.retrieval.get_latest_block().unwrap(), 112);
    for block in &fork {
        let served = h.retrieval.get_block(block.height).await.unwrap();
        assert_eq!(served.hash, block.hash, "height {}", block.height);
    }
    let kept = h.retrieval.get_block(104).await.unwrap();
    assert_eq!(kept.hash, main[4].hash);
    assert_eq!(h.ingestor.state().reorg_count, 0);
}

#[tokio::test]
async fn test_range_over_evicted_heights_stops_at_first_failure() {
    let chain = ChainBuilder::new(0).chain(100, 5);
    let mut h = harness(MockBlockSource::with_blocks(chain.clone()), 2, 100);
    h.ingestor.poll_round(&h.stop).await.unwrap();
    assert_eq!(h.cache.window(), Some((103, 104)));

    h.source.fail_always(102);
    let items: Vec<_> = h.retrieval.get_block_range(100, 104, None).collect().await;

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_ref().unwrap().hash, chain[0].hash);
    assert_eq!(items[1].as_ref().unwrap().hash, chain[1].hash);
    assert!(matches!(
        items[2],
        Err(RetrievalError::Source { height: 102, .. })
    ));
}

#[tokio::test]
async fn test_ingestor_waits_at_tip_then_resumes() {
    let chain = ChainBuilder::new(0).chain(100, 3);
    let mut h = harness(MockBlockSource::with_blocks(chain.clone()), 10, 100);

    assert_eq!(h.ingestor.poll_round(&h.stop).await.unwrap(), RoundOutcome::CaughtUp);
    assert_eq!(h.retrieval.get_latest_block().unwrap(), 102);

    h.source.extend(ChainBuilder::new(0).extend(&chain[2], 2));
    h.ingestor.poll_round(&h.stop).await.unwrap();
    assert_eq!(h.retrieval.get_latest_block().unwrap(), 104);
}
