//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::verify::LmdbVerifyStore;
use crate::LmdbError;

const UTXO_DB: &str = "utxo";
const META_DB: &str = "meta";
const VIOLATIONS_DB: &str = "violations";

/// Wraps the LMDB environment and all database handles for one node's
/// verification state.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) utxo_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) violations_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // Safety contract of heed's open: no other process may have the
        // environment open with different flags. Each run owns its own
        // per-node directory, so this holds.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(3)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let utxo_db = env.create_database(&mut wtxn, Some(UTXO_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        let violations_db = env.create_database(&mut wtxn, Some(VIOLATIONS_DB))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            utxo_db,
            meta_db,
            violations_db,
        })
    }

    /// Remove any state left by a previous run, then open a fresh
    /// environment. Ledger reconstruction must start from an empty store.
    pub fn reset(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale verification db"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Self::open(path, map_size)
    }

    /// The combined ledger/checkpoint/violation store view.
    pub fn verify_store(&self) -> LmdbVerifyStore {
        LmdbVerifyStore {
            env: Arc::clone(&self.env),
            utxo_db: self.utxo_db,
            meta_db: self.meta_db,
            violations_db: self.violations_db,
        }
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }
}
