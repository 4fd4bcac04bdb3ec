//! The ledger's unspent-output record.

use crate::TxId;
use serde::{Deserialize, Serialize};

/// One transaction output's value and spend status, as reconstructed from
/// the replayed block stream.
///
/// Inserted exactly once when its owning transaction is observed, marked
/// spent at most once when a later transaction consumes it, and never
/// deleted — the final state stays in the store for supply reconciliation
/// and for debugging fee mismatches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub amount: u64,
    /// Id of the transaction that spent this output. `None` = unspent.
    #[serde(default)]
    pub spent_by: Option<TxId>,
}

impl UnspentOutput {
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            spent_by: None,
        }
    }

    pub fn is_unspent(&self) -> bool {
        self.spent_by.is_none()
    }
}
