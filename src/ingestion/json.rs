//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"date":"2024-01-15", ...}, ...]`
//! - Newline-delimited JSON (NDJSON): one object per line
//!
//! Keys may be snake_case (`cloud_provider`, `cost_usd`) or camelCase.

use std::fs;
use std::path::Path;

use crate::error::{SpendError, SpendResult};
use crate::types::SpendRecord;

use super::record::{
    check_cost, malformed, parse_bool, parse_cost, parse_date, parse_text, Column, RecordParts,
};

/// Ingest a JSON file into validated [`SpendRecord`]s.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> SpendResult<Vec<SpendRecord>> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string.
///
/// An empty array is a valid, empty dataset; blank input is not.
pub fn ingest_json_from_str(input: &str) -> SpendResult<Vec<SpendRecord>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SpendError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items),
            obj @ serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&obj)),
            _ => Err(SpendError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON. Decode errors carry the line/column of the whole input.
        let values = serde_json::Deserializer::from_str(trimmed)
            .into_iter::<serde_json::Value>()
            .collect::<Result<Vec<_>, _>>()?;
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[serde_json::Value]) -> SpendResult<Vec<SpendRecord>> {
    let mut out = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| SpendError::SchemaMismatch {
            message: format!("row {row} is not a json object"),
        })?;

        let field = |column: Column| lookup(obj, row, column);

        let parts = RecordParts {
            date: parse_date(row, &string_value(row, Column::Date, field(Column::Date)?)?)?,
            text: [
                text_value(row, Column::CloudProvider, field(Column::CloudProvider)?)?,
                text_value(row, Column::Service, field(Column::Service)?)?,
                text_value(row, Column::Team, field(Column::Team)?)?,
                text_value(row, Column::Env, field(Column::Env)?)?,
            ],
            cost_usd: cost_value(row, field(Column::CostUsd)?)?,
            anomaly: bool_value(row, field(Column::Anomaly)?)?,
        };
        out.push(parts.into_record());
    }

    Ok(out)
}

fn lookup<'a>(
    obj: &'a serde_json::Map<String, serde_json::Value>,
    row: usize,
    column: Column,
) -> SpendResult<&'a serde_json::Value> {
    column
        .names()
        .iter()
        .find_map(|name| obj.get(*name))
        .ok_or_else(|| SpendError::SchemaMismatch {
            message: format!("row {row} missing required field '{}'", column.name()),
        })
}

fn string_value(row: usize, column: Column, v: &serde_json::Value) -> SpendResult<String> {
    v.as_str()
        .map(str::to_owned)
        .ok_or_else(|| malformed(row, column, &v.to_string(), "expected string"))
}

fn text_value(row: usize, column: Column, v: &serde_json::Value) -> SpendResult<String> {
    parse_text(row, column, &string_value(row, column, v)?)
}

fn cost_value(row: usize, v: &serde_json::Value) -> SpendResult<f64> {
    match v {
        serde_json::Value::Number(n) => {
            let raw = n.to_string();
            let f = n
                .as_f64()
                .ok_or_else(|| malformed(row, Column::CostUsd, &raw, "expected number"))?;
            check_cost(row, &raw, f)
        }
        // Some exports quote numbers.
        serde_json::Value::String(s) => parse_cost(row, s),
        other => Err(malformed(row, Column::CostUsd, &other.to_string(), "expected number")),
    }
}

fn bool_value(row: usize, v: &serde_json::Value) -> SpendResult<bool> {
    match v {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::String(s) => parse_bool(row, s),
        other => Err(malformed(row, Column::Anomaly, &other.to_string(), "expected bool")),
    }
}
