//! Shared column definitions and value parsing for record ingestion.

use chrono::NaiveDate;

use crate::error::{SpendError, SpendResult};
use crate::types::SpendRecord;

/// An input column of a spend record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    CloudProvider,
    Service,
    Team,
    Env,
    CostUsd,
    Anomaly,
}

impl Column {
    /// Every required column, in record order.
    pub const ALL: [Column; 7] = [
        Column::Date,
        Column::CloudProvider,
        Column::Service,
        Column::Team,
        Column::Env,
        Column::CostUsd,
        Column::Anomaly,
    ];

    /// Accepted header/key spellings; the first one is used in error messages.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["date"],
            Column::CloudProvider => &["cloud_provider", "cloudProvider"],
            Column::Service => &["service"],
            Column::Team => &["team"],
            Column::Env => &["env"],
            Column::CostUsd => &["cost_usd", "costUsd"],
            Column::Anomaly => &["anomaly"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.names()[0]
    }

    pub fn matches(&self, key: &str) -> bool {
        self.names().contains(&key)
    }
}

/// Typed cell values for one record, before assembly.
pub(crate) struct RecordParts {
    pub date: NaiveDate,
    pub text: [String; 4],
    pub cost_usd: f64,
    pub anomaly: bool,
}

impl RecordParts {
    pub(crate) fn into_record(self) -> SpendRecord {
        let [cloud_provider, service, team, env] = self.text;
        SpendRecord {
            date: self.date,
            cloud_provider,
            service,
            team,
            env,
            cost_usd: self.cost_usd,
            anomaly: self.anomaly,
        }
    }
}

pub(crate) fn malformed(row: usize, column: Column, raw: &str, message: impl Into<String>) -> SpendError {
    SpendError::MalformedRecord {
        row,
        field: column.name().to_string(),
        raw: raw.to_string(),
        message: message.into(),
    }
}

pub(crate) fn parse_date(row: usize, raw: &str) -> SpendResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| malformed(row, Column::Date, raw, format!("expected YYYY-MM-DD date: {e}")))
}

/// Labels are kept verbatim; filters compare them exactly.
pub(crate) fn parse_text(row: usize, column: Column, raw: &str) -> SpendResult<String> {
    if raw.trim().is_empty() {
        return Err(malformed(row, column, raw, "expected a non-empty string"));
    }
    Ok(raw.to_owned())
}

pub(crate) fn check_cost(row: usize, raw: &str, v: f64) -> SpendResult<f64> {
    if !v.is_finite() || v < 0.0 {
        return Err(malformed(
            row,
            Column::CostUsd,
            raw,
            "cost must be a finite, non-negative number",
        ));
    }
    Ok(v)
}

pub(crate) fn parse_cost(row: usize, raw: &str) -> SpendResult<f64> {
    let v = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(row, Column::CostUsd, raw, e.to_string()))?;
    check_cost(row, raw, v)
}

pub(crate) fn parse_bool(row: usize, raw: &str) -> SpendResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err(malformed(
            row,
            Column::Anomaly,
            raw,
            "expected bool (true/false/1/0/yes/no)",
        )),
    }
}
