//! LMDB storage backend for the chaindiff verification ledger.
//!
//! Implements the storage traits from `chaindiff-store` using the `heed`
//! LMDB bindings. One environment per node under test, holding three
//! databases: the unspent-output ledger, run metadata (the verification
//! checkpoint), and the fee-violation audit log.

pub mod environment;
pub mod error;
pub mod verify;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use verify::LmdbVerifyStore;
