//! Run orchestration for chaindiff.
//!
//! Wires the pieces together: loads the TOML configuration, connects to
//! both nodes, resets the per-node LMDB ledgers, spawns one sync producer
//! per node, and hands the two streams to the verification coordinator.
//! Runs can execute once or on a configured schedule.

pub mod config;
pub mod error;
pub mod node;
pub mod notify;
pub mod producer;
pub mod runner;
pub mod scheduler;
pub mod shutdown;

pub use config::VerifyConfig;
pub use error::NodeError;
pub use node::NodeHandle;
pub use notify::WebhookNotifier;
pub use producer::{spawn_producer, ProducerConfig};
pub use runner::{run_once, run_pipeline, Pipeline};
pub use scheduler::run_scheduled;
pub use shutdown::ShutdownController;
