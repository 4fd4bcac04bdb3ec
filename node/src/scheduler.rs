//! Scheduled execution: optional delayed start plus periodic re-runs.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use chaindiff_check::Notifier;

use crate::{run_once, NodeError, ShutdownController, VerifyConfig};

const START_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run the verification per the `[task]` schedule, delivering each run's
/// report to `notifier`. Without a schedule this is a single run.
pub async fn run_scheduled<N: Notifier>(
    config: &VerifyConfig,
    notifier: &N,
    shutdown: &ShutdownController,
) -> Result<(), NodeError> {
    // Subscribed before anything starts so a stop signal arriving during
    // a run is still seen by the between-runs waits.
    let mut stop_rx = shutdown.subscribe();

    if let Some(start) = &config.task.start {
        let start_time = parse_start(start)?;
        let now = Local::now().naive_local();
        if start_time > now {
            let wait = (start_time - now).to_std().unwrap_or_default();
            info!(start = %start_time, "waiting for scheduled start");
            tokio::select! {
                _ = stop_rx.recv() => return Ok(()),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    loop {
        let report = run_once(config, shutdown).await?;
        notifier.notify(&report).await;

        let Some(interval) = config.task.interval_secs else {
            return Ok(());
        };
        info!(interval_secs = interval, "run complete, sleeping until next cycle");
        tokio::select! {
            _ = stop_rx.recv() => return Ok(()),
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }
    }
}

fn parse_start(s: &str) -> Result<NaiveDateTime, NodeError> {
    NaiveDateTime::parse_from_str(s, START_FORMAT)
        .map_err(|e| NodeError::Schedule(format!("bad start time {s:?}: {e}")))
}
