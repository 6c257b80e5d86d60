//! In-memory spend transformations.
//!
//! The processing layer operates on `&[SpendRecord]` snapshots produced by ingestion and
//! never mutates them. Data flows one way:
//!
//! - [`filter()`]: narrow by [`crate::types::FilterCriteria`]
//! - [`sort()`]: order by [`crate::types::SortSpec`]
//! - [`summarize()`]: totals, provider/service breakdowns, monthly trend
//! - [`facets()`]: distinct values for populating filter choices
//!
//! ## Example: filter → sort → summarize
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cloud_spend_pipeline::processing::{apply_view, summarize};
//! use cloud_spend_pipeline::types::{FilterCriteria, SortField, SortSpec, SpendRecord};
//!
//! let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
//! let records = vec![
//!     SpendRecord::new(day("2024-01-15"), "AWS", "S3", "core", "prod", 100.0, false),
//!     SpendRecord::new(day("2024-02-10"), "AWS", "S3", "core", "prod", 150.0, false),
//!     SpendRecord::new(day("2024-02-11"), "GCP", "GCS", "data", "prod", 40.0, true),
//! ];
//!
//! let view = apply_view(
//!     &records,
//!     &FilterCriteria::all().with_cloud_provider("AWS"),
//!     &SortSpec::desc(SortField::CostUsd),
//! );
//! assert_eq!(view[0].cost_usd, 150.0);
//!
//! let summary = summarize(&view).unwrap();
//! assert_eq!(summary.total_cost, 250.0);
//! assert_eq!(summary.monthly_series[1].trend_percent, Some(50.0));
//! ```

pub mod aggregate;
pub mod facets;
pub mod filter;
pub mod sort;

pub use aggregate::{
    summarize, summarize_with, ProviderShare, SummaryOptions, ESTIMATED_SAVINGS_RATE,
    TOP_SERVICES_LIMIT,
};
pub use facets::{facets, FilterOptions};
pub use filter::filter;
pub use sort::sort;

use crate::types::{FilterCriteria, SortSpec, SpendRecord};

/// Advisory shown by callers when a view comes back empty.
pub const EMPTY_STATE_MESSAGE: &str =
    "No data found for this filter. Try broadening your search!";

/// Filter then sort: the record sequence a table view displays.
pub fn apply_view(
    records: &[SpendRecord],
    criteria: &FilterCriteria,
    spec: &SortSpec,
) -> Vec<SpendRecord> {
    sort(&filter(records, criteria), spec)
}
