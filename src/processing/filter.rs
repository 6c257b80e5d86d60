//! Record filtering by [`FilterCriteria`].

use tracing::debug;

use crate::types::{active, FilterCriteria, SpendRecord};

/// Returns the records matching every active criterion, in input order.
///
/// - `month` compares against the record's `YYYY-MM` key.
/// - `cloud_provider`, `team`, `env` are exact, case-sensitive matches.
/// - `search_text` is a case-insensitive substring of either `service` or `team`.
pub fn filter(records: &[SpendRecord], criteria: &FilterCriteria) -> Vec<SpendRecord> {
    let needle = criteria.search_text.to_lowercase();
    let out: Vec<SpendRecord> = records
        .iter()
        .filter(|record| matches_with_needle(record, criteria, &needle))
        .cloned()
        .collect();
    debug!(input = records.len(), output = out.len(), "filtered spend records");
    out
}

/// True if `record` passes every active criterion.
pub fn matches(record: &SpendRecord, criteria: &FilterCriteria) -> bool {
    matches_with_needle(record, criteria, &criteria.search_text.to_lowercase())
}

fn matches_with_needle(record: &SpendRecord, criteria: &FilterCriteria, needle: &str) -> bool {
    if let Some(month) = active(&criteria.month) {
        if record.month_key() != month {
            return false;
        }
    }
    if !exact(&criteria.cloud_provider, &record.cloud_provider)
        || !exact(&criteria.team, &record.team)
        || !exact(&criteria.env, &record.env)
    {
        return false;
    }
    needle.is_empty()
        || record.service.to_lowercase().contains(needle)
        || record.team.to_lowercase().contains(needle)
}

fn exact(wanted: &Option<String>, actual: &str) -> bool {
    active(wanted).is_none_or(|w| w == actual)
}
