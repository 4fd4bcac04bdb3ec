//! Handle for one node under comparison.

use chaindiff_rpc::{ChainRpc, Client, RpcAuth};
use tracing::info;

use crate::NodeError;

/// A connected node: its RPC client plus the build version it reported
/// at startup. The version strings identify the two sides in reports.
pub struct NodeHandle {
    pub client: Client,
    pub version: String,
}

impl NodeHandle {
    /// Connect and verify the endpoint answers by asking for its version.
    pub async fn connect(name: &str, auth: RpcAuth) -> Result<Self, NodeError> {
        let url = auth.url.clone();
        let client = Client::new(auth)?;
        let version = client.node_version().await?;
        info!(node = name, %url, %version, "connected");
        Ok(Self { client, version })
    }
}
