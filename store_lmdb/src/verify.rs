//! LMDB implementation of the verification-store traits.
//!
//! Key formats:
//! - `utxo`: binary composite key from [`OutPoint::to_key_bytes`], bincode
//!   [`UnspentOutput`] value.
//! - `meta`: fixed string keys, u64 BE values.
//! - `violations`: block hash bytes, bincode [`FeeViolation`] value.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use chaindiff_store::{CheckpointStore, LedgerStore, StoreError, ViolationStore};
use chaindiff_types::{FeeViolation, OutPoint, TxId, UnspentOutput};

use crate::LmdbError;

const LAST_VERIFIED_ORDER_KEY: &[u8] = b"last_verified_order";

pub struct LmdbVerifyStore {
    pub(crate) env: Arc<Env>,
    pub(crate) utxo_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) violations_db: Database<Bytes, Bytes>,
}

impl LedgerStore for LmdbVerifyStore {
    fn put_output(&self, outpoint: &OutPoint, amount: u64) -> Result<(), StoreError> {
        let key = outpoint.to_key_bytes();
        let bytes = bincode::serialize(&UnspentOutput::new(amount)).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .utxo_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(outpoint.to_string()));
        }
        self.utxo_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn mark_spent(&self, outpoint: &OutPoint, spender: &TxId) -> Result<(), StoreError> {
        let key = outpoint.to_key_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let stored = self
            .utxo_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(outpoint.to_string()))?;
        let mut record: UnspentOutput = bincode::deserialize(stored).map_err(LmdbError::from)?;
        record.spent_by = Some(spender.clone());
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.utxo_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_output(&self, outpoint: &OutPoint) -> Result<UnspentOutput, StoreError> {
        let key = outpoint.to_key_bytes();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let stored = self
            .utxo_db
            .get(&rtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(outpoint.to_string()))?;
        let record: UnspentOutput = bincode::deserialize(stored).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn sum_unspent(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.utxo_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut total: u64 = 0;
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let record: UnspentOutput = bincode::deserialize(val).map_err(LmdbError::from)?;
            if record.is_unspent() {
                total += record.amount;
            }
        }
        Ok(total)
    }
}

impl CheckpointStore for LmdbVerifyStore {
    fn last_verified_order(&self) -> Result<Option<u64>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .meta_db
            .get(&rtxn, LAST_VERIFIED_ORDER_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                if bytes.len() != 8 {
                    return Err(StoreError::Corruption(
                        "invalid checkpoint bytes length".into(),
                    ));
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Ok(Some(u64::from_be_bytes(buf)))
            }
            None => Ok(None),
        }
    }

    fn set_last_verified_order(&self, order: u64) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, LAST_VERIFIED_ORDER_KEY, &order.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl ViolationStore for LmdbVerifyStore {
    fn add_violation(&self, violation: &FeeViolation) -> Result<(), StoreError> {
        let bytes = bincode::serialize(violation).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.violations_db
            .put(&mut wtxn, violation.block_hash.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn violations(&self) -> Result<Vec<FeeViolation>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.violations_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let violation: FeeViolation = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push(violation);
        }
        Ok(results)
    }
}
