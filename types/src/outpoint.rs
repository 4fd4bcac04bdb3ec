//! Transaction identifiers and the composite ledger key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction identifier as reported by the node RPC (hex string).
///
/// The harness never interprets the id — it only compares, stores, and
/// prints it — so it stays a string rather than a fixed-width hash.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A reference to one output of one transaction — the unique key of every
/// ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxId,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: impl Into<TxId>, vout: u32) -> Self {
        Self {
            txid: txid.into(),
            vout,
        }
    }

    /// Binary key encoding for key-value backends:
    /// `u16 BE id length ++ id bytes ++ u32 BE vout`.
    ///
    /// The length prefix keeps variable-length ids unambiguous — no two
    /// distinct outpoints encode to the same bytes.
    pub fn to_key_bytes(&self) -> Vec<u8> {
        let id = self.txid.as_str().as_bytes();
        let mut key = Vec::with_capacity(2 + id.len() + 4);
        key.extend_from_slice(&(id.len() as u16).to_be_bytes());
        key.extend_from_slice(id);
        key.extend_from_slice(&self.vout.to_be_bytes());
        key
    }

    /// Decode a key produced by [`OutPoint::to_key_bytes`].
    pub fn from_key_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 6 {
            return None;
        }
        let id_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        if bytes.len() != 2 + id_len + 4 {
            return None;
        }
        let id = std::str::from_utf8(&bytes[2..2 + id_len]).ok()?;
        let mut vout_buf = [0u8; 4];
        vout_buf.copy_from_slice(&bytes[2 + id_len..]);
        Some(Self {
            txid: TxId::new(id),
            vout: u32::from_be_bytes(vout_buf),
        })
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bytes_round_trip() {
        let op = OutPoint::new("c7f2a9d4e1", 7);
        let key = op.to_key_bytes();
        assert_eq!(OutPoint::from_key_bytes(&key), Some(op));
    }

    #[test]
    fn key_bytes_are_unambiguous() {
        // Same concatenated text, different id/vout split.
        let a = OutPoint::new("ab", 1);
        let b = OutPoint::new("ab1", 0);
        assert_ne!(a.to_key_bytes(), b.to_key_bytes());
    }

    #[test]
    fn truncated_key_rejected() {
        let key = OutPoint::new("deadbeef", 3).to_key_bytes();
        assert_eq!(OutPoint::from_key_bytes(&key[..key.len() - 1]), None);
        assert_eq!(OutPoint::from_key_bytes(&[]), None);
    }

    #[test]
    fn display_is_txid_colon_vout() {
        let op = OutPoint::new("aa11", 2);
        assert_eq!(op.to_string(), "aa11:2");
    }
}
