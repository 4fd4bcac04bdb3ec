//! JSON-RPC 2.0 client for the DAG-chain nodes under test.
//!
//! Exposes the small RPC surface the verification pipeline needs:
//! block-by-order, block count, blue/red classification, and node identity.
//! The [`ChainRpc`] trait abstracts the transport so producers can be
//! driven by a scripted fake in tests.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ChainRpc, Client, RpcAuth};
pub use error::RpcError;
pub use types::{NodeInfo, RpcBlock, RpcTransaction, RpcVin, RpcVout};
