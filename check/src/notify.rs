//! Report delivery.

use std::future::Future;

use tracing::{info, warn};

use crate::VerificationReport;

/// Sink for the end-of-run report.
///
/// Delivery is best-effort: a notifier must not fail the run, so the
/// method is infallible and implementations log their own errors.
pub trait Notifier: Send + Sync {
    fn notify(&self, report: &VerificationReport) -> impl Future<Output = ()> + Send;
}

/// Default notifier: writes the report to the log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    async fn notify(&self, report: &VerificationReport) {
        if report.is_clean() {
            info!("{}", report.summary());
        } else {
            warn!("{}", report.summary());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracing_notifier_accepts_any_report() {
        TracingNotifier.notify(&VerificationReport::default()).await;
    }
}
