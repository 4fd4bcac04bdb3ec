//! chaindiff daemon — replays a block range against two builds of the
//! same node and reports every consensus or fee divergence.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use chaindiff_check::{Notifier, TracingNotifier, VerificationReport};
use chaindiff_node::{
    run_once, run_scheduled, NodeError, ShutdownController, VerifyConfig, WebhookNotifier,
};

#[derive(Parser)]
#[command(
    name = "chaindiff",
    about = "Differential consensus verification between two node builds"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "chaindiff.toml", env = "CHAINDIFF_CONFIG")]
    config: PathBuf,

    /// Override the configured data directory.
    #[arg(long, env = "CHAINDIFF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the configured log level: "trace", "debug", "info",
    /// "warn", "error".
    #[arg(long, env = "CHAINDIFF_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run per the configured `[task]` schedule (a single run when no
    /// schedule is set).
    Run,
    /// Ignore the schedule and run exactly once. Exits non-zero when the
    /// run found divergence.
    RunOnce,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = VerifyConfig::from_toml_file(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.check.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    chaindiff_utils::init_tracing_with_level(&config.log_level);
    tracing::info!(config = %cli.config.display(), "loaded configuration");

    let shutdown = Arc::new(ShutdownController::new());
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move { signals.wait_for_signal().await });

    match cli.command {
        Command::Run => {
            dispatch_scheduled(&config, &shutdown).await?;
        }
        Command::RunOnce => {
            let report = run_once(&config, &shutdown).await?;
            deliver(&config, &report).await;
            if !report.is_clean() {
                tracing::error!(violations = report.violations.len(), "divergence detected");
                std::process::exit(1);
            }
        }
    }

    tracing::info!("chaindiff exited cleanly");
    Ok(())
}

async fn dispatch_scheduled(
    config: &VerifyConfig,
    shutdown: &ShutdownController,
) -> Result<(), NodeError> {
    match &config.notify.webhook_url {
        Some(url) => run_scheduled(config, &WebhookNotifier::new(url.as_str()), shutdown).await,
        None => run_scheduled(config, &TracingNotifier, shutdown).await,
    }
}

async fn deliver(config: &VerifyConfig, report: &VerificationReport) {
    match &config.notify.webhook_url {
        Some(url) => WebhookNotifier::new(url.as_str()).notify(report).await,
        None => TracingNotifier.notify(report).await,
    }
}
