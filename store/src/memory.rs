//! In-memory storage backend for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{CheckpointStore, LedgerStore, StoreError, ViolationStore};
use chaindiff_types::{FeeViolation, OutPoint, TxId, UnspentOutput};

/// In-memory implementation of the store traits.
///
/// Backed by mutex-guarded maps; interior mutability so it satisfies the
/// same `&self` contracts as the LMDB backend.
#[derive(Default)]
pub struct MemoryStore {
    outputs: Mutex<BTreeMap<Vec<u8>, UnspentOutput>>,
    checkpoint: Mutex<Option<u64>>,
    violations: Mutex<BTreeMap<String, FeeViolation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded outputs (spent and unspent).
    pub fn output_count(&self) -> usize {
        self.outputs.lock().expect("lock poisoned").len()
    }
}

impl LedgerStore for MemoryStore {
    fn put_output(&self, outpoint: &OutPoint, amount: u64) -> Result<(), StoreError> {
        let mut outputs = self.outputs.lock().expect("lock poisoned");
        let key = outpoint.to_key_bytes();
        if outputs.contains_key(&key) {
            return Err(StoreError::Duplicate(outpoint.to_string()));
        }
        outputs.insert(key, UnspentOutput::new(amount));
        Ok(())
    }

    fn mark_spent(&self, outpoint: &OutPoint, spender: &TxId) -> Result<(), StoreError> {
        let mut outputs = self.outputs.lock().expect("lock poisoned");
        let record = outputs
            .get_mut(&outpoint.to_key_bytes())
            .ok_or_else(|| StoreError::NotFound(outpoint.to_string()))?;
        record.spent_by = Some(spender.clone());
        Ok(())
    }

    fn get_output(&self, outpoint: &OutPoint) -> Result<UnspentOutput, StoreError> {
        let outputs = self.outputs.lock().expect("lock poisoned");
        outputs
            .get(&outpoint.to_key_bytes())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(outpoint.to_string()))
    }

    fn sum_unspent(&self) -> Result<u64, StoreError> {
        let outputs = self.outputs.lock().expect("lock poisoned");
        Ok(outputs
            .values()
            .filter(|record| record.is_unspent())
            .map(|record| record.amount)
            .sum())
    }
}

impl CheckpointStore for MemoryStore {
    fn last_verified_order(&self) -> Result<Option<u64>, StoreError> {
        Ok(*self.checkpoint.lock().expect("lock poisoned"))
    }

    fn set_last_verified_order(&self, order: u64) -> Result<(), StoreError> {
        *self.checkpoint.lock().expect("lock poisoned") = Some(order);
        Ok(())
    }
}

impl ViolationStore for MemoryStore {
    fn add_violation(&self, violation: &FeeViolation) -> Result<(), StoreError> {
        self.violations
            .lock()
            .expect("lock poisoned")
            .insert(violation.block_hash.clone(), violation.clone());
        Ok(())
    }

    fn violations(&self) -> Result<Vec<FeeViolation>, StoreError> {
        Ok(self
            .violations
            .lock()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_and_duplicate() {
        let store = MemoryStore::new();
        let op = OutPoint::new("t1", 0);

        store.put_output(&op, 50).unwrap();
        assert_eq!(store.get_output(&op).unwrap(), UnspentOutput::new(50));

        let err = store.put_output(&op, 50).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn mark_spent_flips_record_and_requires_existing_key() {
        let store = MemoryStore::new();
        let op = OutPoint::new("t1", 1);

        let err = store.mark_spent(&op, &TxId::new("t2")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        store.put_output(&op, 10).unwrap();
        store.mark_spent(&op, &TxId::new("t2")).unwrap();
        let record = store.get_output(&op).unwrap();
        assert_eq!(record.spent_by, Some(TxId::new("t2")));
        assert!(!record.is_unspent());
    }

    #[test]
    fn sum_unspent_skips_spent_outputs() {
        let store = MemoryStore::new();
        store.put_output(&OutPoint::new("a", 0), 30).unwrap();
        store.put_output(&OutPoint::new("b", 0), 12).unwrap();
        store
            .mark_spent(&OutPoint::new("a", 0), &TxId::new("c"))
            .unwrap();

        assert_eq!(store.sum_unspent().unwrap(), 12);
    }

    #[test]
    fn checkpoint_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.last_verified_order().unwrap(), None);
        store.set_last_verified_order(42).unwrap();
        assert_eq!(store.last_verified_order().unwrap(), Some(42));
    }

    #[test]
    fn violations_are_persisted_and_listed() {
        let store = MemoryStore::new();
        let violation = FeeViolation {
            block_hash: "h1".into(),
            block_order: 9,
            reported_coinbase: 1,
            computed_fee: 2,
        };
        store.add_violation(&violation).unwrap();
        assert_eq!(store.violations().unwrap(), vec![violation]);
    }
}
