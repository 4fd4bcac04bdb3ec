use chaindiff_store::StoreError;
use chaindiff_types::{FeeViolation, OutPoint};
use thiserror::Error;

/// Disagreement between the two nodes on a consensus attribute of the
/// block at one order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("order mismatch: release order={release}, test order={test}")]
    OrderMismatch { release: u64, test: u64 },

    #[error("hash mismatch at order {order}: release hash={release}, test hash={test}")]
    HashMismatch {
        order: u64,
        release: String,
        test: String,
    },

    #[error("txsvalid mismatch at order {order}: release={release}, test={test}")]
    ValidityMismatch {
        order: u64,
        release: bool,
        test: bool,
    },

    #[error("isBlue mismatch at order {order}: release={release}, test={test}")]
    ColorMismatch { order: u64, release: i32, test: i32 },
}

/// Failure of one node's fee verification for one block.
///
/// `FeeMismatch` and `MissingOutput` are recordable divergences — the
/// pipeline logs them and continues. `Store` wraps backend failures
/// (including corruption), which abort the run.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error("{0}")]
    FeeMismatch(FeeViolation),

    #[error("referenced output {outpoint} not found (block order={order}, hash={hash})")]
    MissingOutput {
        outpoint: OutPoint,
        order: u64,
        hash: String,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Unrecoverable pipeline failure — an internal-state defect, not a
/// divergence between the nodes.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
