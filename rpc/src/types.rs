//! Wire types for the node's JSON-RPC responses.
//!
//! Field names follow the node's JSON exactly; only the fields the
//! verification pipeline consumes are modeled. Unknown fields are ignored.

use chaindiff_types::{AnnotatedBlock, BlockTx, TxId, TxInput, TxOutput};
use serde::Deserialize;

/// A block as returned by `getBlockByOrder`.
#[derive(Clone, Debug, Deserialize)]
pub struct RpcBlock {
    pub hash: String,
    #[serde(default)]
    pub id: u64,
    pub order: u64,
    #[serde(rename = "txsvalid")]
    pub txs_valid: bool,
    #[serde(rename = "isBlue", default)]
    pub is_blue: i32,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RpcTransaction {
    pub txid: String,
    #[serde(default)]
    pub duplicate: bool,
    #[serde(default)]
    pub vin: Vec<RpcVin>,
    #[serde(default)]
    pub vout: Vec<RpcVout>,
}

/// A transaction input. `txid`/`vout` are present only when the input
/// spends a previous output; `coinbase` is present only on coinbase inputs.
#[derive(Clone, Debug, Deserialize)]
pub struct RpcVin {
    #[serde(default)]
    pub txid: String,
    #[serde(default)]
    pub vout: u32,
    #[serde(default)]
    pub coinbase: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RpcVout {
    pub amount: u64,
}

/// Subset of `getNodeInfo` the harness consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "buildversion")]
    pub build_version: String,
}

impl From<RpcBlock> for AnnotatedBlock {
    fn from(block: RpcBlock) -> Self {
        AnnotatedBlock {
            id: block.id,
            order: block.order,
            hash: block.hash,
            transactions_valid: block.txs_valid,
            is_blue: block.is_blue,
            confirmations: block.confirmations,
            transactions: block.transactions.into_iter().map(BlockTx::from).collect(),
        }
    }
}

impl From<RpcTransaction> for BlockTx {
    fn from(tx: RpcTransaction) -> Self {
        BlockTx {
            txid: TxId::new(tx.txid),
            duplicate: tx.duplicate,
            inputs: tx.vin.into_iter().map(TxInput::from).collect(),
            outputs: tx
                .vout
                .into_iter()
                .map(|out| TxOutput { amount: out.amount })
                .collect(),
        }
    }
}

impl From<RpcVin> for TxInput {
    fn from(vin: RpcVin) -> Self {
        TxInput {
            prev_txid: (!vin.txid.is_empty()).then(|| TxId::new(vin.txid)),
            prev_vout: vin.vout,
            coinbase: (!vin.coinbase.is_empty()).then_some(vin.coinbase),
        }
    }
}
