use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tracing::debug;

/// Events emitted by the [`super::ExecutionEngine`].
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { views: usize },
    ViewStarted { index: usize },
    ViewFinished { index: usize, output_records: usize, ok: bool },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        debug!(?event, "execution event");
    }
}

/// Counters for one [`super::ExecutionEngine::evaluate`] run.
///
/// Every run gets its own instance, so concurrent runs on one engine never share counters.
pub struct ExecutionMetrics {
    run_id: u64,
    elapsed_ns: AtomicU64,

    records_scanned: AtomicU64,
    views_started: AtomicU64,
    views_finished: AtomicU64,
    views_failed: AtomicU64,

    active_views: AtomicUsize,
    max_active_views: AtomicUsize,
}

impl ExecutionMetrics {
    pub fn new(run_id: u64) -> Self {
        Self {
            run_id,
            elapsed_ns: AtomicU64::new(0),
            records_scanned: AtomicU64::new(0),
            views_started: AtomicU64::new(0),
            views_finished: AtomicU64::new(0),
            views_failed: AtomicU64::new(0),
            active_views: AtomicUsize::new(0),
            max_active_views: AtomicUsize::new(0),
        }
    }

    pub(crate) fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub(crate) fn on_view_start(&self, scanned: usize) {
        self.views_started.fetch_add(1, Ordering::SeqCst);
        self.records_scanned.fetch_add(scanned as u64, Ordering::SeqCst);
        let now = self
            .active_views
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        self.max_active_views.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn on_view_end(&self, ok: bool) {
        self.views_finished.fetch_add(1, Ordering::SeqCst);
        if !ok {
            self.views_failed.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self
            .active_views
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)));
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        ExecutionMetricsSnapshot {
            run_id: self.run_id,
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            records_scanned: self.records_scanned.load(Ordering::SeqCst),
            views_started: self.views_started.load(Ordering::SeqCst),
            views_finished: self.views_finished.load(Ordering::SeqCst),
            views_failed: self.views_failed.load(Ordering::SeqCst),
            max_active_views: self.max_active_views.load(Ordering::SeqCst),
        }
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub records_scanned: u64,
    pub views_started: u64,
    pub views_finished: u64,
    pub views_failed: u64,
    pub max_active_views: usize,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, views={}/{} (failed {}), records_scanned={}, max_active_views={}, elapsed={:?}",
            self.run_id,
            self.views_finished,
            self.views_started,
            self.views_failed,
            self.records_scanned,
            self.max_active_views,
            self.elapsed
        )
    }
}
