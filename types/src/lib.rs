//! Fundamental types for the chaindiff verification harness.
//!
//! This crate defines the data model shared across every other crate in the
//! workspace: transaction/output identifiers, the ledger's unspent-output
//! record, the annotated block a sync producer emits, fee-violation records,
//! and the protocol constants the supply reconciliation depends on.

pub mod block;
pub mod outpoint;
pub mod output;
pub mod params;
pub mod violation;

pub use block::{AnnotatedBlock, BlockTx, TxInput, TxOutput};
pub use outpoint::{OutPoint, TxId};
pub use output::UnspentOutput;
pub use params::{expected_supply, BLOCK_SUBSIDY, CONFIRMATION_DEPTH, GENESIS_ALLOTMENT};
pub use violation::FeeViolation;
