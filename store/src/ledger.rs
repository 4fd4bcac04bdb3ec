//! Unspent-output ledger storage trait.

use crate::StoreError;
use chaindiff_types::{OutPoint, TxId, UnspentOutput};

/// Trait for the per-node unspent-output ledger.
///
/// Keys are [`OutPoint`]s. Each entry represents one transaction output
/// observed in the replayed block stream. Entries are inserted exactly once,
/// marked spent at most once, and never deleted — there is deliberately no
/// delete operation, so the final ledger state can be reconciled against the
/// expected total supply after a run.
pub trait LedgerStore {
    /// Insert a new unspent output.
    ///
    /// Fails with [`StoreError::Duplicate`] if an entry already exists for
    /// this outpoint. Callers must skip insertion for transactions the node
    /// flagged as duplicates.
    fn put_output(&self, outpoint: &OutPoint, amount: u64) -> Result<(), StoreError>;

    /// Mark an output as spent by `spender`.
    ///
    /// Fails with [`StoreError::NotFound`] if no such output was recorded.
    fn mark_spent(&self, outpoint: &OutPoint, spender: &TxId) -> Result<(), StoreError>;

    /// Retrieve a recorded output.
    ///
    /// Fails with [`StoreError::NotFound`] if no such output was recorded.
    fn get_output(&self, outpoint: &OutPoint) -> Result<UnspentOutput, StoreError>;

    /// Full scan: total amount across records whose spender is empty.
    ///
    /// Fails with [`StoreError::Corruption`] if a stored record cannot be
    /// decoded — that indicates an unrecoverable internal-state defect.
    fn sum_unspent(&self) -> Result<u64, StoreError>;
}
