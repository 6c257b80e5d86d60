//! `cloud-spend-pipeline` is the data core of a cloud spend viewer: it narrows a snapshot of
//! cost line items with filters and free-text search, orders it, and derives the statistics
//! and export projections a dashboard shows.
//!
//! Every stage is a pure function over `&[SpendRecord]`. Nothing is cached and nothing is
//! mutated; when the criteria or the data change, callers simply recompute.
//!
//! ## Data flow
//!
//! ```text
//! ingestion ─▶ filter ─▶ sort ─▶ ┬─▶ summarize (totals, breakdowns, monthly trend)
//!                                └─▶ export (CSV rows, report summary)
//! ```
//!
//! ## Quick example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cloud_spend_pipeline::export::{to_csv_string, to_report_summary};
//! use cloud_spend_pipeline::processing::{apply_view, summarize};
//! use cloud_spend_pipeline::types::{FilterCriteria, SortSpec, SpendRecord};
//!
//! let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
//! let records = vec![
//!     SpendRecord::new(day("2024-01-15"), "AWS", "S3", "core", "prod", 100.0, false),
//!     SpendRecord::new(day("2024-02-10"), "AWS", "S3", "core", "prod", 150.0, true),
//! ];
//!
//! let view = apply_view(&records, &FilterCriteria::all().with_search_text("s3"), &SortSpec::default());
//! let summary = summarize(&view).unwrap();
//! assert_eq!(summary.total_cost, 250.0);
//! assert_eq!(summary.monthly_series[1].trend_percent, Some(50.0));
//!
//! let report = to_report_summary(&view).unwrap();
//! assert_eq!(report.anomaly_count, 1);
//!
//! let csv = to_csv_string(&view).unwrap();
//! assert!(csv.starts_with("date,cloudProvider,service,team,env,costUsd,anomaly\n"));
//! ```
//!
//! ## Loading data
//!
//! ```no_run
//! use cloud_spend_pipeline::ingestion::{ingest_from_path, IngestionOptions};
//!
//! # fn main() -> Result<(), cloud_spend_pipeline::SpendError> {
//! // Auto-detects by extension (.csv/.json/.ndjson).
//! let records = ingest_from_path("cloud_spend_data.json", &IngestionOptions::default())?;
//! println!("records={}", records.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: records, filter criteria, sort specs and summary types
//! - [`processing`]: filter, sort, aggregate and facet derivation
//! - [`export`]: CSV rows and printable report values
//! - [`ingestion`]: CSV/JSON loading with validation and observer hooks
//! - [`execution`]: evaluate several views in parallel over one snapshot
//! - [`error`]: the shared error type

pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{SpendError, SpendResult};
