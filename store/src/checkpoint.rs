//! Verification-progress checkpoint trait.

use crate::StoreError;

/// Trait for persisting the last successfully verified block order.
///
/// The checkpoint is monotonic in normal operation; it is used for
/// restart/resume and for progress reporting.
pub trait CheckpointStore {
    /// The last verified order, or `None` if no block has been verified yet.
    fn last_verified_order(&self) -> Result<Option<u64>, StoreError>;

    /// Persist the last verified order.
    fn set_last_verified_order(&self, order: u64) -> Result<(), StoreError>;
}
