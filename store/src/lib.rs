//! Abstract storage traits for the chaindiff verification ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The verification engine depends only on the traits; each node
//! under test gets its own independent store instance, so the two ledgers
//! never share state.

pub mod checkpoint;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod violations;

pub use checkpoint::CheckpointStore;
pub use error::StoreError;
pub use ledger::LedgerStore;
pub use memory::MemoryStore;
pub use violations::ViolationStore;

/// Everything a fee verifier needs from its backing store.
///
/// Blanket-implemented for any type that provides the three component
/// traits, so backends only implement those.
pub trait VerifyStore: LedgerStore + CheckpointStore + ViolationStore {}

impl<S: LedgerStore + CheckpointStore + ViolationStore> VerifyStore for S {}
