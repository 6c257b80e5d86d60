use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type SpendResult<T> = Result<T, SpendError>;

/// Error type returned across ingestion, aggregation and export.
///
/// Empty inputs are never an error anywhere in the pipeline; only malformed data and
/// programmer mistakes (unknown sort fields or filter keys) are.
#[derive(Debug, Error)]
pub enum SpendError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected shape (missing columns, not an object, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A record violates the [`crate::types::SpendRecord`] invariants.
    ///
    /// `row` is 1-based for ingested files and 0-based (slice index) for in-memory checks.
    #[error("malformed record at row {row} field '{field}': {message} (raw='{raw}')")]
    MalformedRecord {
        row: usize,
        field: String,
        raw: String,
        message: String,
    },

    /// Unknown sort field, filter key or similar call-site mistake.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl SpendError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
