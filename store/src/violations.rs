//! Fee-violation audit log trait.

use crate::StoreError;
use chaindiff_types::FeeViolation;

/// Trait for the persistent fee-violation log.
///
/// Violations are keyed by block hash, written once, and never mutated.
pub trait ViolationStore {
    /// Record a detected fee violation.
    fn add_violation(&self, violation: &FeeViolation) -> Result<(), StoreError>;

    /// All recorded violations (full scan, key order).
    fn violations(&self) -> Result<Vec<FeeViolation>, StoreError>;
}
