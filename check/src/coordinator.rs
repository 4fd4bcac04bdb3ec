//! Dual-stream coordinator.
//!
//! Pairs the two producers' block streams order-by-order and drives the
//! consistency and fee checks over each pair. Failures are additive: a
//! recordable divergence goes into the report and the loop keeps going;
//! only store errors (internal-state defects) abort the run.

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{error, info, warn};

use chaindiff_store::LedgerStore;
use chaindiff_types::{expected_supply, AnnotatedBlock};

use crate::{
    check_consistency, CheckError, FeeError, FeeVerifier, NodeSide, VerificationReport, Violation,
};

/// How often verification progress is logged, in blocks.
const PROGRESS_INTERVAL: u64 = 2000;

/// Drives one verification run over a pair of block streams.
pub struct Coordinator {
    release: FeeVerifier,
    test: FeeVerifier,
    release_version: String,
    test_version: String,
    start_order: u64,
    shutdown: broadcast::Receiver<()>,
}

impl Coordinator {
    pub fn new(
        release: FeeVerifier,
        test: FeeVerifier,
        release_version: impl Into<String>,
        test_version: impl Into<String>,
        start_order: u64,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            release,
            test,
            release_version: release_version.into(),
            test_version: test_version.into(),
            start_order,
            shutdown,
        }
    }

    /// Consume both streams to exhaustion (or until a stop signal) and
    /// return the run's report.
    ///
    /// Both producers emit strictly increasing orders starting from the
    /// same point, so the nth message of each channel describes the same
    /// chain order; pairing is by position.
    pub async fn run(
        mut self,
        mut release_rx: mpsc::Receiver<AnnotatedBlock>,
        mut test_rx: mpsc::Receiver<AnnotatedBlock>,
    ) -> Result<VerificationReport, CheckError> {
        let started = Instant::now();
        let mut report = VerificationReport {
            release_version: self.release_version.clone(),
            test_version: self.test_version.clone(),
            start_order: self.start_order,
            ..Default::default()
        };

        loop {
            let Some(release_block) = self.next_block(&mut release_rx).await else {
                break;
            };
            let Some(test_block) = self.next_block(&mut test_rx).await else {
                break;
            };

            if let Err(err) = check_consistency(&release_block, &test_block) {
                warn!("consistency violation: {err}");
                report.violations.push(Violation::Consistency(err));
            }

            apply_fee_check(&self.release, NodeSide::Release, &release_block, &mut report)?;
            apply_fee_check(&self.test, NodeSide::Test, &test_block, &mut report)?;

            report.blocks_verified += 1;
            report.last_order = release_block.order;
            if report.blocks_verified % PROGRESS_INTERVAL == 0 {
                info!(
                    order = release_block.order,
                    blocks = report.blocks_verified,
                    violations = report.violations.len(),
                    "verification progress"
                );
            }
        }

        self.reconcile_supply(&mut report)?;
        report.elapsed_secs = started.elapsed().as_secs();
        Ok(report)
    }

    /// Next block from one stream, or `None` when the stream is closed or
    /// a stop signal arrives while waiting.
    async fn next_block(
        &mut self,
        rx: &mut mpsc::Receiver<AnnotatedBlock>,
    ) -> Option<AnnotatedBlock> {
        tokio::select! {
            _ = self.shutdown.recv() => {
                info!("stop signal received, ending verification");
                None
            }
            block = rx.recv() => block,
        }
    }

    /// Check each ledger's unspent total against the expected supply.
    ///
    /// The expected-supply formula assumes the ledger was built from
    /// genesis, so reconciliation only runs when the range started there.
    fn reconcile_supply(&self, report: &mut VerificationReport) -> Result<(), CheckError> {
        if report.blocks_verified == 0 {
            return Ok(());
        }
        if self.start_order != 0 {
            info!(
                start_order = self.start_order,
                "supply reconciliation skipped: range does not start at genesis"
            );
            return Ok(());
        }
        let expected = expected_supply(report.blocks_verified);
        for (side, verifier) in [
            (NodeSide::Release, &self.release),
            (NodeSide::Test, &self.test),
        ] {
            let total_unspent = verifier.store().sum_unspent()?;
            if total_unspent != expected {
                error!(
                    node = %side,
                    total_unspent,
                    expected,
                    "unspent total does not reconcile with expected supply"
                );
                report.violations.push(Violation::SupplyMismatch {
                    node: side,
                    total_unspent,
                    expected,
                    blocks_verified: report.blocks_verified,
                });
            }
        }
        Ok(())
    }
}

fn apply_fee_check(
    verifier: &FeeVerifier,
    side: NodeSide,
    block: &AnnotatedBlock,
    report: &mut VerificationReport,
) -> Result<(), CheckError> {
    match verifier.verify_block(block) {
        Ok(()) => Ok(()),
        Err(FeeError::FeeMismatch(violation)) => {
            warn!(node = %side, "{violation}");
            report.violations.push(Violation::Fee {
                node: side,
                violation,
            });
            Ok(())
        }
        Err(FeeError::MissingOutput {
            outpoint,
            order,
            hash,
        }) => {
            report.violations.push(Violation::MissingOutput {
                node: side,
                outpoint,
                order,
                hash,
            });
            Ok(())
        }
        Err(FeeError::Store(err)) => {
            error!(node = %side, order = block.order, "store failure: {err}");
            Err(CheckError::Store(err))
        }
    }
}
