//! Ingestion boundary: files in, validated [`crate::types::SpendRecord`]s out.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - validates every record (calendar date, finite non-negative cost, non-empty labels)
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`json`].

pub mod csv;
pub mod json;
pub mod observability;
pub mod record;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use record::Column;
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
