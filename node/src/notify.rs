//! Webhook delivery of the end-of-run report.

use chaindiff_check::{Notifier, VerificationReport};
use tracing::{debug, warn};

/// Posts the report summary as JSON to a configured webhook.
///
/// Delivery is best-effort; failures are logged and swallowed so a dead
/// webhook cannot fail a run that already finished.
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, report: &VerificationReport) {
        let payload = serde_json::json!({
            "text": report.summary(),
            "clean": report.is_clean(),
            "blocks_verified": report.blocks_verified,
        });
        match self.http.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(url = %self.url, "report delivered");
            }
            Ok(response) => {
                warn!(url = %self.url, status = %response.status(), "webhook rejected report");
            }
            Err(e) => warn!(url = %self.url, "webhook delivery failed: {e}"),
        }
    }
}
