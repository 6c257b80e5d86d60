//! Distinct field values used to populate filter choices.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::SpendRecord;

/// Selectable values per filterable field, each sorted ascending and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub months: Vec<String>,
    pub cloud_providers: Vec<String>,
    pub teams: Vec<String>,
    pub envs: Vec<String>,
}

/// Collect the filter choices present in `records`.
///
/// Callers typically pass the full (unfiltered) snapshot so choices don't disappear as
/// filters are applied.
pub fn facets(records: &[SpendRecord]) -> FilterOptions {
    let mut months = BTreeSet::new();
    let mut providers = BTreeSet::new();
    let mut teams = BTreeSet::new();
    let mut envs = BTreeSet::new();

    for r in records {
        months.insert(r.month_key());
        providers.insert(r.cloud_provider.as_str());
        teams.insert(r.team.as_str());
        envs.insert(r.env.as_str());
    }

    FilterOptions {
        months: months.into_iter().collect(),
        cloud_providers: providers.into_iter().map(str::to_owned).collect(),
        teams: teams.into_iter().map(str::to_owned).collect(),
        envs: envs.into_iter().map(str::to_owned).collect(),
    }
}
