//! Run configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chaindiff_rpc::RpcAuth;
use chaindiff_types::CONFIRMATION_DEPTH;

use crate::NodeError;

/// Configuration for a verification run.
///
/// Can be loaded from a TOML file via [`VerifyConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The two node endpoints are
/// required; everything else has defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// The node running the release build.
    pub release: RpcAuth,

    /// The node running the build under test.
    pub test: RpcAuth,

    #[serde(default)]
    pub check: CheckSection,

    #[serde(default)]
    pub task: TaskSection,

    #[serde(default)]
    pub notify: NotifySection,
}

/// Parameters of the verification pipeline itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckSection {
    /// First block order to fetch. Supply reconciliation only runs when
    /// this is 0, since the expected-supply formula assumes a ledger
    /// built from genesis.
    #[serde(default)]
    pub start_order: u64,

    /// Last order (exclusive) to verify. When absent, the release node's
    /// block count at startup bounds the run.
    #[serde(default)]
    pub end_order: Option<u64>,

    /// Root directory for the per-node ledger databases.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Capacity of each producer-to-coordinator channel.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long a producer waits before retrying a fetch.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Required confirmations before a producer trusts a block.
    #[serde(default = "default_confirmation_depth")]
    pub confirmation_depth: u32,

    /// LMDB map size per node ledger, in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,
}

/// Optional schedule: delayed start and periodic re-runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskSection {
    /// Local wall-clock start time, "YYYY-MM-DD HH:MM:SS". Absent means
    /// start immediately.
    #[serde(default)]
    pub start: Option<String>,

    /// Re-run the full verification every this many seconds. Absent means
    /// run once and exit.
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

/// Where to deliver the end-of-run report, besides the log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NotifySection {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./chaindiff_data")
}

fn default_queue_capacity() -> usize {
    100
}

fn default_retry_delay_secs() -> u64 {
    10
}

fn default_confirmation_depth() -> u32 {
    CONFIRMATION_DEPTH
}

fn default_map_size_mb() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VerifyConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("VerifyConfig is always serializable to TOML")
    }
}

impl CheckSection {
    pub fn map_size(&self) -> usize {
        self.map_size_mb * 1024 * 1024
    }
}

impl Default for CheckSection {
    fn default() -> Self {
        Self {
            start_order: 0,
            end_order: None,
            data_dir: default_data_dir(),
            queue_capacity: default_queue_capacity(),
            retry_delay_secs: default_retry_delay_secs(),
            confirmation_depth: default_confirmation_depth(),
            map_size_mb: default_map_size_mb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [release]
        url = "https://127.0.0.1:1234"

        [test]
        url = "https://127.0.0.1:1235"
    "#;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = VerifyConfig::from_toml_str(MINIMAL).expect("should parse");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.check.start_order, 0);
        assert_eq!(config.check.end_order, None);
        assert_eq!(config.check.queue_capacity, 100);
        assert_eq!(config.check.retry_delay_secs, 10);
        assert_eq!(config.check.confirmation_depth, 720);
        assert!(config.task.start.is_none());
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn parsed_config_round_trips_through_toml() {
        let config = VerifyConfig::from_toml_str(MINIMAL).expect("should parse");
        let parsed = VerifyConfig::from_toml_str(&config.to_toml_string()).expect("should parse");
        assert_eq!(parsed.release.url, config.release.url);
        assert_eq!(parsed.check.queue_capacity, config.check.queue_capacity);
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            log_level = "debug"

            [release]
            url = "https://10.0.0.1:1234"
            user = "admin"
            pass = "123"
            allow_self_signed = true

            [test]
            url = "https://10.0.0.2:1234"

            [check]
            start_order = 5
            end_order = 100000
            retry_delay_secs = 2

            [task]
            start = "2026-09-01 00:00:00"
            interval_secs = 86400

            [notify]
            webhook_url = "https://hooks.example.com/x"
        "#;
        let config = VerifyConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_level, "debug");
        assert!(config.release.allow_self_signed);
        assert_eq!(config.release.user, "admin");
        assert_eq!(config.check.start_order, 5);
        assert_eq!(config.check.end_order, Some(100_000));
        assert_eq!(config.check.retry_delay_secs, 2);
        assert_eq!(config.task.start.as_deref(), Some("2026-09-01 00:00:00"));
        assert_eq!(config.task.interval_secs, Some(86_400));
        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("https://hooks.example.com/x")
        );
        // confirmation depth untouched
        assert_eq!(config.check.confirmation_depth, 720);
    }

    #[test]
    fn missing_node_section_is_an_error() {
        let err = VerifyConfig::from_toml_str("log_level = \"info\"").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = VerifyConfig::from_toml_file(Path::new("/nonexistent/chaindiff.toml"));
        assert!(matches!(result.unwrap_err(), NodeError::Config(_)));
    }

    #[test]
    fn map_size_is_in_mib() {
        let config = VerifyConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.check.map_size(), 1024 * 1024 * 1024);
    }
}
