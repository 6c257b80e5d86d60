//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{SpendError, SpendResult};
use crate::types::SpendRecord;

use super::record::{parse_bool, parse_cost, parse_date, parse_text, Column, RecordParts};

/// Ingest a CSV file into validated [`SpendRecord`]s.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every record column (order can differ; snake_case or camelCase).
/// - Each value is validated; the first bad cell fails the whole load.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> SpendResult<Vec<SpendRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> SpendResult<Vec<SpendRecord>> {
    let headers = rdr.headers()?.clone();

    // Map record columns -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = [0usize; 7];
    for (slot, column) in col_idxs.iter_mut().zip(Column::ALL) {
        match headers.iter().position(|h| column.matches(h.trim())) {
            Some(idx) => *slot = idx,
            None => {
                return Err(SpendError::SchemaMismatch {
                    message: format!(
                        "missing required column '{col}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        col = column.name()
                    ),
                });
            }
        }
    }

    let mut out = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;
        let cell = |column: Column| {
            let idx = col_idxs[column as usize];
            record.get(idx).unwrap_or("")
        };

        let parts = RecordParts {
            date: parse_date(user_row, cell(Column::Date))?,
            text: [
                parse_text(user_row, Column::CloudProvider, cell(Column::CloudProvider))?,
                parse_text(user_row, Column::Service, cell(Column::Service))?,
                parse_text(user_row, Column::Team, cell(Column::Team))?,
                parse_text(user_row, Column::Env, cell(Column::Env))?,
            ],
            cost_usd: parse_cost(user_row, cell(Column::CostUsd))?,
            anomaly: parse_bool(user_row, cell(Column::Anomaly))?,
        };
        out.push(parts.into_record());
    }

    Ok(out)
}
