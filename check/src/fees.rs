//! Fee verification against a locally reconstructed unspent-output ledger.
//!
//! Each node under test gets its own [`FeeVerifier`] over its own store.
//! For every block the verifier records the block's new outputs, then
//! replays its spends, and checks that the coinbase value the node put in
//! the block equals the reconstructed fee total plus the block subsidy.

use std::sync::Arc;

use tracing::warn;

use chaindiff_store::{CheckpointStore, LedgerStore, StoreError, VerifyStore, ViolationStore};
use chaindiff_types::{AnnotatedBlock, FeeViolation, OutPoint, BLOCK_SUBSIDY};

use crate::FeeError;

/// Replays one node's block stream against a private ledger.
pub struct FeeVerifier {
    store: Arc<dyn VerifyStore + Send + Sync>,
}

impl FeeVerifier {
    pub fn new(store: Arc<dyn VerifyStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// The backing store, for end-of-run reconciliation.
    pub fn store(&self) -> &Arc<dyn VerifyStore + Send + Sync> {
        &self.store
    }

    /// Verify one block and, on success, advance the checkpoint.
    ///
    /// Any failure leaves the checkpoint at the previous order, so a
    /// restart resumes at the first block that did not verify cleanly.
    pub fn verify_block(&self, block: &AnnotatedBlock) -> Result<(), FeeError> {
        self.check_block(block)?;
        self.store.set_last_verified_order(block.order)?;
        Ok(())
    }

    fn check_block(&self, block: &AnnotatedBlock) -> Result<(), FeeError> {
        // A block the node itself marked invalid contributes nothing to the
        // ledger; its coinbase is not subject to the fee equation either.
        if !block.transactions_valid {
            return Ok(());
        }

        self.record_outputs(block)?;

        // The genesis allotment is minted, not earned, so the fee equation
        // does not apply to it.
        if block.is_genesis() {
            return Ok(());
        }

        let fee = self.replay_spends(block)?;
        let computed = fee + i128::from(BLOCK_SUBSIDY);

        let reported = block
            .coinbase_tx()
            .and_then(|tx| tx.outputs.first())
            .map_or(0, |out| out.amount);

        if i128::from(reported) != computed {
            let violation = FeeViolation {
                block_hash: block.hash.clone(),
                block_order: block.order,
                reported_coinbase: reported,
                computed_fee: clamp_to_u64(computed),
            };
            self.store.add_violation(&violation)?;
            return Err(FeeError::FeeMismatch(violation));
        }
        Ok(())
    }

    /// First pass: insert every output of every transaction the node does
    /// not flag as a duplicate.
    ///
    /// A `Duplicate` store error on a non-flagged transaction means the
    /// node re-served an output the ledger already holds without marking
    /// the replay; the ledger can no longer be trusted, so it is escalated
    /// as a store error.
    fn record_outputs(&self, block: &AnnotatedBlock) -> Result<(), FeeError> {
        for tx in &block.transactions {
            if tx.duplicate {
                continue;
            }
            for (vout, output) in tx.outputs.iter().enumerate() {
                let outpoint = OutPoint::new(tx.txid.clone(), vout as u32);
                self.store.put_output(&outpoint, output.amount)?;
            }
        }
        Ok(())
    }

    /// Second pass: mark every referenced output spent and accumulate the
    /// block's fee total (inputs minus outputs across non-coinbase,
    /// non-duplicate transactions).
    ///
    /// Signed accumulation: a malformed block whose outputs exceed its
    /// inputs must surface as a fee mismatch, not as an arithmetic wrap.
    fn replay_spends(&self, block: &AnnotatedBlock) -> Result<i128, FeeError> {
        let mut fee: i128 = 0;
        for tx in &block.transactions {
            if tx.is_coinbase() || tx.duplicate {
                continue;
            }
            for input in &tx.inputs {
                let Some(outpoint) = input.outpoint() else {
                    continue;
                };
                let record = match self.store.get_output(&outpoint) {
                    Ok(record) => record,
                    Err(StoreError::NotFound(_)) => {
                        warn!(
                            order = block.order,
                            hash = %block.hash,
                            %outpoint,
                            "input references an output the ledger never saw"
                        );
                        return Err(FeeError::MissingOutput {
                            outpoint,
                            order: block.order,
                            hash: block.hash.clone(),
                        });
                    }
                    Err(e) => return Err(e.into()),
                };
                fee += i128::from(record.amount);
                self.store.mark_spent(&outpoint, &tx.txid)?;
            }
            fee -= i128::from(tx.output_total());
        }
        Ok(fee)
    }
}

fn clamp_to_u64(value: i128) -> u64 {
    value.clamp(0, i128::from(u64::MAX)) as u64
}
