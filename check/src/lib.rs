//! Core verification engine for chaindiff.
//!
//! Two independently produced block streams (one per node build) are paired
//! order-by-order and run through two checks:
//!
//! - the **consistency checker** compares the consensus attributes both
//!   nodes report for the same order (hash, validity, blue/red color);
//! - the **fee verifier** replays each node's blocks against a private
//!   unspent-output ledger and checks that every block's coinbase equals
//!   the reconstructed fee total plus the block subsidy.
//!
//! Failures are additive: every divergence is appended to the run's
//! [`VerificationReport`] and the pipeline keeps going, so one pass
//! characterizes all divergence across the replayed range.

pub mod consistency;
pub mod coordinator;
pub mod error;
pub mod fees;
pub mod notify;
pub mod report;

pub use consistency::check_consistency;
pub use coordinator::Coordinator;
pub use error::{CheckError, ConsistencyError, FeeError};
pub use fees::FeeVerifier;
pub use notify::{Notifier, TracingNotifier};
pub use report::{NodeSide, VerificationReport, Violation};
