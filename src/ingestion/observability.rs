//! Hooks for reporting ingestion outcomes.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::SpendError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// The load failed because of the data (bad row, missing column).
    Error,
    /// The load failed because of the environment (I/O).
    Critical,
}

impl IngestionSeverity {
    /// Classify a load failure.
    pub fn for_error(e: &SpendError) -> Self {
        match e {
            SpendError::Io(_) => IngestionSeverity::Critical,
            SpendError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
                _ => IngestionSeverity::Error,
            },
            SpendError::Json(err) if err.is_io() => IngestionSeverity::Critical,
            SpendError::Json(_)
            | SpendError::SchemaMismatch { .. }
            | SpendError::MalformedRecord { .. }
            | SpendError::Configuration { .. } => IngestionSeverity::Error,
        }
    }
}

/// Where a load came from.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: IngestionFormat,
}

/// Figures reported for a successful load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestionStats {
    /// Number of records loaded.
    pub records: usize,
    /// Records flagged as anomalies.
    pub anomalies: usize,
    /// Sum of `cost_usd` over the loaded records.
    pub total_cost_usd: f64,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &SpendError) {}

    /// Called when a failure meets the alert threshold. Defaults to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SpendError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to several observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SpendError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SpendError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits ingestion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            records = stats.records,
            anomalies = stats.anomalies,
            total_cost_usd = stats.total_cost_usd,
            "spend data loaded"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, err: &SpendError) {
        warn!(
            ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            error = %err,
            "spend data load failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, err: &SpendError) {
        error!(
            ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            error = %err,
            "ALERT: spend data load failed"
        );
    }
}
