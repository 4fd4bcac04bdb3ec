//! End-to-end pipeline tests: scripted nodes, real LMDB ledgers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use chaindiff_check::{FeeVerifier, NodeSide, VerificationReport, Violation};
use chaindiff_node::{run_pipeline, Pipeline, ProducerConfig, ShutdownController};
use chaindiff_rpc::{ChainRpc, RpcError};
use chaindiff_store_lmdb::LmdbEnvironment;
use chaindiff_types::{
    AnnotatedBlock, BlockTx, TxId, TxInput, TxOutput, BLOCK_SUBSIDY, GENESIS_ALLOTMENT,
};

/// A node whose whole chain is in memory and always fully confirmed.
struct FakeNode {
    blocks: HashMap<u64, AnnotatedBlock>,
    colors: HashMap<String, i32>,
}

impl FakeNode {
    fn new(chain: Vec<AnnotatedBlock>) -> Self {
        Self {
            blocks: chain.into_iter().map(|b| (b.order, b)).collect(),
            colors: HashMap::new(),
        }
    }

    fn with_color(mut self, hash: &str, color: i32) -> Self {
        self.colors.insert(hash.to_string(), color);
        self
    }
}

impl ChainRpc for FakeNode {
    async fn block_by_order(&self, order: u64) -> Result<Option<AnnotatedBlock>, RpcError> {
        Ok(self.blocks.get(&order).cloned())
    }

    async fn is_blue(&self, hash: &str) -> Result<i32, RpcError> {
        Ok(self.colors.get(hash).copied().unwrap_or(1))
    }

    async fn block_count(&self) -> Result<u64, RpcError> {
        Ok(self.blocks.len() as u64)
    }

    async fn node_version(&self) -> Result<String, RpcError> {
        Ok("fake".into())
    }
}

fn coinbase(txid: &str, amount: u64) -> BlockTx {
    BlockTx {
        txid: TxId::new(txid),
        duplicate: false,
        inputs: vec![TxInput {
            prev_txid: None,
            prev_vout: 0,
            coinbase: Some("03".into()),
        }],
        outputs: vec![TxOutput { amount }],
    }
}

fn honest_chain(n: u64) -> Vec<AnnotatedBlock> {
    (0..n)
        .map(|order| AnnotatedBlock {
            id: if order == 0 { 0 } else { order + 1 },
            order,
            hash: format!("h{order}"),
            transactions_valid: true,
            // The producer overwrites this from the color query.
            is_blue: -1,
            confirmations: 10_000,
            transactions: vec![if order == 0 {
                coinbase("gcb", GENESIS_ALLOTMENT)
            } else {
                coinbase(&format!("cb{order}"), BLOCK_SUBSIDY)
            }],
        })
        .collect()
}

async fn run(
    release: FakeNode,
    test: FakeNode,
    end_order: u64,
) -> (VerificationReport, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let map_size = 16 * 1024 * 1024;
    let release_env = LmdbEnvironment::reset(&dir.path().join("release"), map_size).unwrap();
    let test_env = LmdbEnvironment::reset(&dir.path().join("test"), map_size).unwrap();

    let producer_config = |name| ProducerConfig {
        name,
        start_order: 0,
        end_order,
        retry_delay: Duration::from_millis(2),
        confirmation_depth: 720,
    };
    let shutdown = ShutdownController::new();
    let report = run_pipeline(
        Pipeline {
            release_rpc: Arc::new(release),
            test_rpc: Arc::new(test),
            release_verifier: FeeVerifier::new(Arc::new(release_env.verify_store())),
            test_verifier: FeeVerifier::new(Arc::new(test_env.verify_store())),
            release_version: "0.10.1".into(),
            test_version: "0.10.2-dev".into(),
            release_producer: producer_config("release"),
            test_producer: producer_config("test"),
            queue_capacity: 100,
        },
        &shutdown,
    )
    .await
    .expect("pipeline must complete");
    (report, dir)
}

#[tokio::test]
async fn identical_nodes_yield_a_clean_report() {
    let chain = honest_chain(5);
    let (report, _dir) = run(
        FakeNode::new(chain.clone()),
        FakeNode::new(chain),
        5,
    )
    .await;

    assert!(report.is_clean(), "{:?}", report.violations);
    assert_eq!(report.blocks_verified, 5);
    assert_eq!(report.release_version, "0.10.1");
    assert_eq!(report.test_version, "0.10.2-dev");
}

#[tokio::test]
async fn diverging_color_is_the_only_finding() {
    let chain = honest_chain(4);
    let release = FakeNode::new(chain.clone());
    let test = FakeNode::new(chain).with_color("h2", 0);

    let (report, _dir) = run(release, test, 4).await;
    assert_eq!(report.blocks_verified, 4);
    assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
    assert!(matches!(
        &report.violations[0],
        Violation::Consistency(_)
    ));
}

#[tokio::test]
async fn overpaid_coinbase_shows_up_as_fee_and_supply_findings() {
    let chain = honest_chain(3);
    let mut test_chain = chain.clone();
    test_chain[2].transactions[0].outputs[0].amount = BLOCK_SUBSIDY + 11;

    let (report, _dir) = run(FakeNode::new(chain), FakeNode::new(test_chain), 3).await;
    assert_eq!(report.blocks_verified, 3);
    assert_eq!(report.violations.len(), 2, "{:?}", report.violations);
    assert!(matches!(
        &report.violations[0],
        Violation::Fee { node: NodeSide::Test, violation } if violation.block_order == 2
    ));
    assert!(matches!(
        &report.violations[1],
        Violation::SupplyMismatch { node: NodeSide::Test, .. }
    ));
}
