use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("rpc error: {0}")]
    Rpc(#[from] chaindiff_rpc::RpcError),

    #[error("store error: {0}")]
    Store(#[from] chaindiff_store::StoreError),

    #[error("ledger db error: {0}")]
    Lmdb(#[from] chaindiff_store_lmdb::LmdbError),

    #[error("verification error: {0}")]
    Check(#[from] chaindiff_check::CheckError),

    #[error("invalid schedule: {0}")]
    Schedule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}
