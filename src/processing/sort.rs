//! Ordering of record sets by [`SortSpec`].

use std::cmp::Ordering;

use crate::types::{SortDirection, SortField, SortSpec, SpendRecord};

/// Returns a sorted copy of `records`.
///
/// The sort is stable in both directions: descending flips the comparator, so records with
/// equal keys keep their input order.
pub fn sort(records: &[SpendRecord], spec: &SortSpec) -> Vec<SpendRecord> {
    let mut out = records.to_vec();
    out.sort_by(|a, b| compare(a, b, spec));
    out
}

/// Compare two records under `spec`.
pub fn compare(a: &SpendRecord, b: &SpendRecord, spec: &SortSpec) -> Ordering {
    let ord = compare_field(a, b, spec.field);
    match spec.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn compare_field(a: &SpendRecord, b: &SpendRecord, field: SortField) -> Ordering {
    match field {
        SortField::CostUsd => a.cost_usd.total_cmp(&b.cost_usd),
        // ISO dates order the same chronologically and lexicographically.
        SortField::Date => a.date.cmp(&b.date),
        SortField::CloudProvider => collate(&a.cloud_provider, &b.cloud_provider),
        SortField::Service => collate(&a.service, &b.service),
        SortField::Team => collate(&a.team, &b.team),
        SortField::Env => collate(&a.env, &b.env),
    }
}

/// Locale-style string ordering: case-insensitive first, then lowercase before uppercase,
/// then raw code points.
///
/// Only strings that are byte-identical compare equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}
