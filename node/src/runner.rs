//! One full verification run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use chaindiff_check::{Coordinator, FeeVerifier, VerificationReport};
use chaindiff_rpc::ChainRpc;
use chaindiff_store_lmdb::LmdbEnvironment;

use crate::producer::{spawn_producer, ProducerConfig};
use crate::{NodeError, NodeHandle, ShutdownController, VerifyConfig};

/// Execute one verification run: connect to both nodes, rebuild both
/// ledgers from scratch, stream the range through the coordinator, and
/// return its report.
///
/// The range's upper bound is pinned before the first fetch — either
/// from the config or from the release node's block count — so the run
/// terminates even while the chain keeps growing.
pub async fn run_once(
    config: &VerifyConfig,
    shutdown: &ShutdownController,
) -> Result<VerificationReport, NodeError> {
    let release = NodeHandle::connect("release", config.release.clone()).await?;
    let test = NodeHandle::connect("test", config.test.clone()).await?;

    let start_order = config.check.start_order;
    let end_order = match config.check.end_order {
        Some(end) => end,
        None => release.client.block_count().await?,
    };
    info!(start_order, end_order, "starting verification run");

    // Each run reconstructs both ledgers from the stream it is about to
    // verify; state from a previous run would corrupt the fee equation.
    let map_size = config.check.map_size();
    let release_env = LmdbEnvironment::reset(&config.check.data_dir.join("release"), map_size)?;
    let test_env = LmdbEnvironment::reset(&config.check.data_dir.join("test"), map_size)?;

    let producer_config = |name| ProducerConfig {
        name,
        start_order,
        end_order,
        retry_delay: Duration::from_secs(config.check.retry_delay_secs),
        confirmation_depth: config.check.confirmation_depth,
    };

    run_pipeline(
        Pipeline {
            release_rpc: Arc::new(release.client),
            test_rpc: Arc::new(test.client),
            release_verifier: FeeVerifier::new(Arc::new(release_env.verify_store())),
            test_verifier: FeeVerifier::new(Arc::new(test_env.verify_store())),
            release_version: release.version,
            test_version: test.version,
            release_producer: producer_config("release"),
            test_producer: producer_config("test"),
            queue_capacity: config.check.queue_capacity,
        },
        shutdown,
    )
    .await
}

/// Everything one run needs, with the endpoints and stores already built.
/// [`run_once`] assembles this from config; integration tests assemble it
/// from scripted nodes.
pub struct Pipeline<R: ChainRpc> {
    pub release_rpc: Arc<R>,
    pub test_rpc: Arc<R>,
    pub release_verifier: FeeVerifier,
    pub test_verifier: FeeVerifier,
    pub release_version: String,
    pub test_version: String,
    pub release_producer: ProducerConfig,
    pub test_producer: ProducerConfig,
    pub queue_capacity: usize,
}

/// Spawn both producers, drive the coordinator over their streams, and
/// wait for all three tasks to finish.
pub async fn run_pipeline<R: ChainRpc>(
    pipeline: Pipeline<R>,
    shutdown: &ShutdownController,
) -> Result<VerificationReport, NodeError> {
    let (release_tx, release_rx) = mpsc::channel(pipeline.queue_capacity);
    let (test_tx, test_rx) = mpsc::channel(pipeline.queue_capacity);

    let start_order = pipeline.release_producer.start_order;
    let release_producer = spawn_producer(
        pipeline.release_rpc,
        pipeline.release_producer,
        release_tx,
        shutdown.subscribe(),
    );
    let test_producer = spawn_producer(
        pipeline.test_rpc,
        pipeline.test_producer,
        test_tx,
        shutdown.subscribe(),
    );

    let coordinator = Coordinator::new(
        pipeline.release_verifier,
        pipeline.test_verifier,
        pipeline.release_version,
        pipeline.test_version,
        start_order,
        shutdown.subscribe(),
    );
    let report = coordinator.run(release_rx, test_rx).await?;

    // Producers exit on their own once the range is done, the stop signal
    // fires, or their channel's receiver is gone.
    release_producer.await?;
    test_producer.await?;

    Ok(report)
}
