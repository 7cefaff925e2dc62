// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort usage reporting.
//!
//! Reporting runs off the request path: the task is spawned after the
//! decision is finalized and its failure is logged and swallowed, so it can
//! never affect a response that was already computed.

use std::sync::Arc;

use relay_core::{UsageReport, UsageSink};
use tracing::{debug, warn};

/// Spawn a fire-and-forget usage report.
pub fn spawn_report(sink: Arc<dyn UsageSink>, report: UsageReport) {
    tokio::spawn(async move {
        match sink.report(&report).await {
            Ok(()) => debug!(key = %report.key, "usage reported"),
            Err(e) => warn!(key = %report.key, error = %e, "usage report failed (ignored)"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_core::RelayError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakySink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UsageSink for FlakySink {
        async fn report(&self, _report: &UsageReport) -> Result<(), RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RelayError::provider("metering down"))
        }
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let sink = Arc::new(FlakySink {
            calls: AtomicUsize::new(0),
        });
        spawn_report(
            sink.clone(),
            UsageReport {
                key: "k1".into(),
                tenant_id: "t1".into(),
                bot_id: None,
            },
        );

        // Give the spawned task a moment; the failure must not panic or
        // propagate anywhere.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }
}
