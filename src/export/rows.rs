//! Tabular (CSV) projection of a record set.

use std::io;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::SpendResult;
use crate::types::{validate_records, SpendRecord};

/// CSV header, in column order.
pub const TABULAR_HEADER: [&str; 7] = [
    "date",
    "cloudProvider",
    "service",
    "team",
    "env",
    "costUsd",
    "anomaly",
];

/// Human-readable anomaly marker for textual exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnomalyFlag {
    Yes,
    No,
}

impl From<bool> for AnomalyFlag {
    fn from(v: bool) -> Self {
        if v { AnomalyFlag::Yes } else { AnomalyFlag::No }
    }
}

/// One flat export row. Serializes in [`TABULAR_HEADER`] order with two-decimal costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularRow {
    pub date: NaiveDate,
    pub cloud_provider: String,
    pub service: String,
    pub team: String,
    pub env: String,
    #[serde(serialize_with = "two_decimals")]
    pub cost_usd: f64,
    pub anomaly: AnomalyFlag,
}

impl From<&SpendRecord> for TabularRow {
    fn from(r: &SpendRecord) -> Self {
        Self {
            date: r.date,
            cloud_provider: r.cloud_provider.clone(),
            service: r.service.clone(),
            team: r.team.clone(),
            env: r.env.clone(),
            cost_usd: r.cost_usd,
            anomaly: r.anomaly.into(),
        }
    }
}

fn two_decimals<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{v:.2}"))
}

/// Project records into export rows, preserving input order.
pub fn to_tabular_rows(records: &[SpendRecord]) -> SpendResult<Vec<TabularRow>> {
    validate_records(records)?;
    Ok(records.iter().map(TabularRow::from).collect())
}

/// Write the header plus one row per record to `writer`.
///
/// The header is written even when `records` is empty.
pub fn write_csv<W: io::Write>(writer: W, records: &[SpendRecord]) -> SpendResult<()> {
    let rows = to_tabular_rows(records)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(TABULAR_HEADER)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(rows = rows.len(), "wrote csv export");
    Ok(())
}

/// [`write_csv`] into an in-memory string.
pub fn to_csv_string(records: &[SpendRecord]) -> SpendResult<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
