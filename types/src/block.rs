//! The annotated block a sync producer emits into the verification pipeline.

use crate::{OutPoint, TxId};
use serde::{Deserialize, Serialize};

/// A block plus the annotations the checker needs: its position in the
/// chain's total order, the node's validity verdict, and its blue/red
/// classification (resolved by the producer before the block is emitted).
///
/// Within one stream, `order` values are strictly increasing with no gaps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedBlock {
    /// Internal block id assigned by the node. Only consulted together with
    /// `order` to recognize the genesis block.
    #[serde(default)]
    pub id: u64,
    pub order: u64,
    pub hash: String,
    pub transactions_valid: bool,
    /// Blue/red classification code from the DAG consensus — opaque here,
    /// only compared across the two nodes.
    pub is_blue: i32,
    #[serde(default)]
    pub confirmations: u32,
    pub transactions: Vec<BlockTx>,
}

impl AnnotatedBlock {
    /// The genesis block is exempt from fee checking entirely.
    pub fn is_genesis(&self) -> bool {
        self.order == 0 && self.id == 0
    }

    /// The block's single coinbase transaction, if present.
    pub fn coinbase_tx(&self) -> Option<&BlockTx> {
        self.transactions.iter().find(|tx| tx.is_coinbase())
    }
}

/// One transaction within a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTx {
    pub txid: TxId,
    /// Set by the node when the transaction is a replay artifact of a
    /// reorganized block — its outputs must not be inserted a second time.
    #[serde(default)]
    pub duplicate: bool,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

impl BlockTx {
    /// A transaction is coinbase when its first input carries the coinbase
    /// marker instead of a previous-output reference.
    pub fn is_coinbase(&self) -> bool {
        self.inputs
            .first()
            .is_some_and(|input| input.coinbase.is_some())
    }

    /// Sum of this transaction's own output amounts.
    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|out| out.amount).sum()
    }
}

/// One transaction input: either a reference to a previously recorded
/// output, or the coinbase marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Id of the transaction whose output this input consumes.
    /// `None` for coinbase inputs.
    #[serde(default)]
    pub prev_txid: Option<TxId>,
    #[serde(default)]
    pub prev_vout: u32,
    /// Coinbase marker payload. `Some` iff this is a coinbase input.
    #[serde(default)]
    pub coinbase: Option<String>,
}

impl TxInput {
    /// The outpoint this input spends, if it references one.
    pub fn outpoint(&self) -> Option<OutPoint> {
        self.prev_txid
            .as_ref()
            .filter(|txid| !txid.is_empty())
            .map(|txid| OutPoint::new(txid.clone(), self.prev_vout))
    }
}

/// One transaction output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coinbase_tx(amount: u64) -> BlockTx {
        BlockTx {
            txid: TxId::new("cb"),
            duplicate: false,
            inputs: vec![TxInput {
                prev_txid: None,
                prev_vout: 0,
                coinbase: Some("03badd00".into()),
            }],
            outputs: vec![TxOutput { amount }],
        }
    }

    #[test]
    fn coinbase_detected_by_first_input_marker() {
        let tx = coinbase_tx(100);
        assert!(tx.is_coinbase());

        let plain = BlockTx {
            txid: TxId::new("t1"),
            duplicate: false,
            inputs: vec![TxInput {
                prev_txid: Some(TxId::new("t0")),
                prev_vout: 0,
                coinbase: None,
            }],
            outputs: vec![TxOutput { amount: 90 }],
        };
        assert!(!plain.is_coinbase());
    }

    #[test]
    fn outpoint_absent_for_coinbase_and_empty_reference() {
        let cb = coinbase_tx(100);
        assert_eq!(cb.inputs[0].outpoint(), None);

        let empty_ref = TxInput {
            prev_txid: Some(TxId::new("")),
            prev_vout: 3,
            coinbase: None,
        };
        assert_eq!(empty_ref.outpoint(), None);
    }

    #[test]
    fn output_total_sums_all_outputs() {
        let mut tx = coinbase_tx(40);
        tx.outputs.push(TxOutput { amount: 2 });
        assert_eq!(tx.output_total(), 42);
    }

    #[test]
    fn genesis_is_order_zero_and_id_zero() {
        let mut block = AnnotatedBlock {
            id: 0,
            order: 0,
            hash: "g".into(),
            transactions_valid: true,
            is_blue: 1,
            confirmations: 0,
            transactions: vec![],
        };
        assert!(block.is_genesis());

        block.order = 1;
        assert!(!block.is_genesis());
    }
}
