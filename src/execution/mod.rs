//! Parallel evaluation of several views over one snapshot.
//!
//! Every view is a pure function of the shared `&[SpendRecord]`, so views run on a rayon
//! pool without coordination. Results come back in request order.

mod observer;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{SpendError, SpendResult};
use crate::processing::{apply_view, summarize_with, SummaryOptions};
use crate::types::{AggregateSummary, FilterCriteria, SortSpec, SpendRecord};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    TracingExecutionObserver,
};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads. If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Options passed to the aggregator for every view.
    pub summary: SummaryOptions,
}

/// One (criteria, sort) pair to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
}

impl ViewRequest {
    pub fn new(criteria: FilterCriteria, sort: SortSpec) -> Self {
        Self { criteria, sort }
    }
}

/// A filtered+sorted view and its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOutcome {
    pub records: Vec<SpendRecord>,
    pub summary: AggregateSummary,
}

/// Runs [`ViewRequest`]s in parallel over an immutable snapshot.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    next_run_id: AtomicU64,
    last_run: Mutex<Option<ExecutionMetricsSnapshot>>,
}

impl ExecutionEngine {
    /// Create a new engine.
    ///
    /// Fails with [`SpendError::Configuration`] if `num_threads == Some(0)` or the thread
    /// pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> SpendResult<Self> {
        if opts.num_threads == Some(0) {
            return Err(SpendError::configuration("num_threads must be > 0 when set"));
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .map_err(|e| SpendError::configuration(format!("failed to build thread pool: {e}")))?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            next_run_id: AtomicU64::new(1),
            last_run: Mutex::new(None),
        })
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Metrics of the most recently finished run, if any.
    pub fn last_run_metrics(&self) -> Option<ExecutionMetricsSnapshot> {
        self.last_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Evaluate every request against `records`.
    ///
    /// Each outcome fails independently (e.g. a malformed record only fails the views that
    /// include it). Several threads may call this on one engine at once; each call counts
    /// into its own [`ExecutionMetrics`].
    pub fn evaluate(
        &self,
        records: &[SpendRecord],
        requests: &[ViewRequest],
    ) -> Vec<SpendResult<ViewOutcome>> {
        let start = Instant::now();
        let metrics = ExecutionMetrics::new(self.next_run_id.fetch_add(1, Ordering::SeqCst));
        self.emit(ExecutionEvent::RunStarted {
            views: requests.len(),
        });

        let out: Vec<SpendResult<ViewOutcome>> = self.pool.install(|| {
            requests
                .par_iter()
                .enumerate()
                .map(|(index, request)| self.evaluate_one(&metrics, index, records, request))
                .collect()
        });

        metrics.end_run(start.elapsed());
        let snapshot = metrics.snapshot();
        *self.last_run.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: snapshot,
        });
        out
    }

    fn evaluate_one(
        &self,
        metrics: &ExecutionMetrics,
        index: usize,
        records: &[SpendRecord],
        request: &ViewRequest,
    ) -> SpendResult<ViewOutcome> {
        metrics.on_view_start(records.len());
        self.emit(ExecutionEvent::ViewStarted { index });

        let view = apply_view(records, &request.criteria, &request.sort);
        let result = summarize_with(&view, &self.opts.summary).map(|summary| ViewOutcome {
            records: view,
            summary,
        });

        let output_records = result.as_ref().map(|o| o.records.len()).unwrap_or(0);
        self.emit(ExecutionEvent::ViewFinished {
            index,
            output_records,
            ok: result.is_ok(),
        });
        metrics.on_view_end(result.is_ok());
        result
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
