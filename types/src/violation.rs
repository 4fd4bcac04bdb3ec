//! Fee-violation records persisted for later audit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A detected disagreement between a block's reported coinbase value and
/// the fee total reconstructed from the ledger. Created the moment the
/// mismatch is detected; never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeViolation {
    pub block_hash: String,
    pub block_order: u64,
    pub reported_coinbase: u64,
    pub computed_fee: u64,
}

impl fmt::Display for FeeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrong fee at block order={} hash={}: coinbase={}, computed={}",
            self.block_order, self.block_hash, self.reported_coinbase, self.computed_fee
        )
    }
}
