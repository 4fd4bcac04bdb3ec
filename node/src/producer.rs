//! Block sync producer.
//!
//! One producer per node walks the configured order range, fetches each
//! block once it is buried under enough confirmations, resolves its
//! blue/red classification, and pushes the annotated block into a bounded
//! channel. The channel provides back-pressure: a producer ahead of the
//! verifier parks on `send` instead of buffering without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use chaindiff_rpc::ChainRpc;
use chaindiff_types::AnnotatedBlock;

#[derive(Clone, Debug)]
pub struct ProducerConfig {
    /// Which node this producer reads from, for logging.
    pub name: &'static str,
    pub start_order: u64,
    /// Exclusive upper bound of the range. Fixed at startup so the run
    /// terminates even while the chain keeps growing.
    pub end_order: u64,
    pub retry_delay: Duration,
    pub confirmation_depth: u32,
}

pub fn spawn_producer<R: ChainRpc>(
    rpc: Arc<R>,
    config: ProducerConfig,
    tx: mpsc::Sender<AnnotatedBlock>,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(produce(rpc, config, tx, shutdown))
}

async fn produce<R: ChainRpc>(
    rpc: Arc<R>,
    config: ProducerConfig,
    tx: mpsc::Sender<AnnotatedBlock>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!(
        node = config.name,
        start = config.start_order,
        end = config.end_order,
        "sync producer started"
    );
    for order in config.start_order..config.end_order {
        let Some(mut block) = await_block(rpc.as_ref(), &config, order, &mut shutdown).await
        else {
            return;
        };
        let Some(color) = resolve_color(rpc.as_ref(), &config, &block.hash, &mut shutdown).await
        else {
            return;
        };
        block.is_blue = color;

        if tx.send(block).await.is_err() {
            debug!(node = config.name, order, "verifier hung up, stopping producer");
            return;
        }
    }
    info!(node = config.name, end = config.end_order, "sync producer finished its range");
}

/// Fetch the block at `order`, retrying until the node serves it with
/// more than `confirmation_depth` confirmations. `None` means a stop
/// signal arrived while waiting.
async fn await_block<R: ChainRpc>(
    rpc: &R,
    config: &ProducerConfig,
    order: u64,
    shutdown: &mut broadcast::Receiver<()>,
) -> Option<AnnotatedBlock> {
    loop {
        match rpc.block_by_order(order).await {
            Ok(Some(block)) if block.confirmations > config.confirmation_depth => {
                return Some(block);
            }
            Ok(Some(block)) => debug!(
                node = config.name,
                order,
                confirmations = block.confirmations,
                "block not buried deep enough yet"
            ),
            Ok(None) => debug!(node = config.name, order, "block not available yet"),
            Err(e) => warn!(node = config.name, order, "block fetch failed: {e}"),
        }
        if !pause(config, shutdown).await {
            return None;
        }
    }
}

/// Resolve the blue/red classification, retrying on failure. The fetch
/// and the classification are separate RPCs, so a block can be served
/// while its color query still fails transiently.
async fn resolve_color<R: ChainRpc>(
    rpc: &R,
    config: &ProducerConfig,
    hash: &str,
    shutdown: &mut broadcast::Receiver<()>,
) -> Option<i32> {
    loop {
        match rpc.is_blue(hash).await {
            Ok(color) => return Some(color),
            Err(e) => warn!(node = config.name, hash, "color query failed: {e}"),
        }
        if !pause(config, shutdown).await {
            return None;
        }
    }
}

/// Sleep out the retry delay. Returns `false` when a stop signal arrives
/// instead.
async fn pause(config: &ProducerConfig, shutdown: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        _ = shutdown.recv() => {
            info!(node = config.name, "stop signal received, producer exiting");
            false
        }
        _ = tokio::time::sleep(config.retry_delay) => true,
    }
}
