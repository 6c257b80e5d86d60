//! Export-ready projections of a record set.
//!
//! Only the data a CSV or printable report must contain is produced here; rendering a PDF
//! (or any other byte format besides CSV) is the caller's concern.
//!
//! - [`rows`]: flat rows with `Yes`/`No` anomaly tokens, plus a CSV writer
//! - [`report`]: total/row/anomaly counts and the advisory message

pub mod report;
pub mod rows;

pub use report::{
    csv_file_name, describe_record, report_file_name, to_report_summary, ReportSummary,
    REPORT_ADVISORY,
};
pub use rows::{to_csv_string, to_tabular_rows, write_csv, AnomalyFlag, TabularRow, TABULAR_HEADER};
