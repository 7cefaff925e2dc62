// SPDX-FileCopyrightText: 2026 Relay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam for the fire-and-forget usage metering collaborator.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::UsageReport;

/// Best-effort usage metering.
///
/// Implementations must be cheap to call; the engine spawns the report off
/// the request path and logs-and-swallows any error, so a failing sink can
/// never fail a request that already produced a decision.
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Report one usage unit.
    async fn report(&self, report: &UsageReport) -> Result<(), RelayError>;
}
