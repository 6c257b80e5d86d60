//! Summary statistics over a record set.
//!
//! Everything here is a full re-derivation from the input slice; nothing is cached.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SpendResult;
use crate::types::{validate_records, AggregateSummary, MonthlyPoint, ServiceCost, SpendRecord};

/// Share of total spend assumed recoverable through production right-sizing.
pub const ESTIMATED_SAVINGS_RATE: f64 = 0.15;

/// Number of services kept in [`AggregateSummary::top_services`].
pub const TOP_SERVICES_LIMIT: usize = 5;

/// Tunables for [`summarize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Fraction of total cost reported as `estimated_savings`.
    pub savings_rate: f64,
    /// Maximum length of the top-services ranking.
    pub top_services: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            savings_rate: ESTIMATED_SAVINGS_RATE,
            top_services: TOP_SERVICES_LIMIT,
        }
    }
}

/// Summarize `records` with the default [`SummaryOptions`].
///
/// Fails with [`crate::SpendError::MalformedRecord`] if any record breaks the record
/// invariants. An empty slice yields a zero-valued summary.
pub fn summarize(records: &[SpendRecord]) -> SpendResult<AggregateSummary> {
    summarize_with(records, &SummaryOptions::default())
}

/// Summarize `records` with explicit options.
pub fn summarize_with(
    records: &[SpendRecord],
    options: &SummaryOptions,
) -> SpendResult<AggregateSummary> {
    validate_records(records)?;

    let total = total_cost(records);
    let summary = AggregateSummary {
        total_cost: total,
        estimated_savings: total * options.savings_rate,
        by_provider: by_provider(records),
        top_services: top_services(records, options.top_services),
        monthly_series: monthly_series(records),
    };
    debug!(
        records = records.len(),
        total_cost = summary.total_cost,
        providers = summary.by_provider.len(),
        months = summary.monthly_series.len(),
        "summarized spend records"
    );
    Ok(summary)
}

/// Sum of `cost_usd`; `0.0` for an empty slice.
pub fn total_cost(records: &[SpendRecord]) -> f64 {
    records.iter().map(|r| r.cost_usd).sum()
}

/// Cost summed per provider.
pub fn by_provider(records: &[SpendRecord]) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    for r in records {
        *out.entry(r.cloud_provider.clone()).or_insert(0.0) += r.cost_usd;
    }
    out
}

/// Services ranked by summed cost, highest first, at most `limit` long.
///
/// Services with equal totals keep the order in which they were first seen.
pub fn top_services(records: &[SpendRecord], limit: usize) -> Vec<ServiceCost> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ServiceCost> = Vec::new();
    for r in records {
        match index.get(r.service.as_str()) {
            Some(&i) => totals[i].cost += r.cost_usd,
            None => {
                index.insert(r.service.as_str(), totals.len());
                totals.push(ServiceCost {
                    service: r.service.clone(),
                    cost: r.cost_usd,
                });
            }
        }
    }
    totals.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    totals.truncate(limit);
    totals
}

/// Cost per `YYYY-MM`, ascending by month, with month-over-month trend.
pub fn monthly_series(records: &[SpendRecord]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        *months.entry(r.month_key()).or_insert(0.0) += r.cost_usd;
    }

    let mut out: Vec<MonthlyPoint> = Vec::with_capacity(months.len());
    let mut prev: Option<f64> = None;
    for (month, total) in months {
        out.push(MonthlyPoint {
            month,
            total_cost: total,
            trend_percent: prev.and_then(|p| trend_percent(p, total)),
        });
        prev = Some(total);
    }
    out
}

/// Percent change from `previous` to `current`, rounded to one decimal.
///
/// `None` when `previous` is zero.
pub fn trend_percent(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some(round1((current - previous) / previous * 100.0))
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// A provider's cost and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderShare {
    pub provider: String,
    pub cost: f64,
    /// Percent of `total_cost`, one decimal. `None` when the total is zero.
    pub percent: Option<f64>,
}

impl AggregateSummary {
    /// Per-provider shares of the total, in provider order.
    pub fn provider_shares(&self) -> Vec<ProviderShare> {
        self.by_provider
            .iter()
            .map(|(provider, &cost)| ProviderShare {
                provider: provider.clone(),
                cost,
                percent: share_percent(cost, self.total_cost),
            })
            .collect()
    }
}

/// `part / total × 100`, one decimal; `None` when `total` is zero.
pub fn share_percent(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(round1(part / total * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpendError;
    use chrono::NaiveDate;

    fn rec(date: &str, provider: &str, service: &str, cost: f64) -> SpendRecord {
        SpendRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            provider,
            service,
            "core",
            "prod",
            cost,
            false,
        )
    }

    #[test]
    fn two_month_example_has_fifty_percent_trend() {
        let records = vec![
            rec("2024-01-15", "AWS", "S3", 100.0),
            rec("2024-02-10", "AWS", "S3", 150.0),
        ];
        let s = summarize(&records).unwrap();
        assert_eq!(s.total_cost, 250.0);
        assert_eq!(
            s.monthly_series,
            vec![
                MonthlyPoint {
                    month: "2024-01".to_string(),
                    total_cost: 100.0,
                    trend_percent: None,
                },
                MonthlyPoint {
                    month: "2024-02".to_string(),
                    total_cost: 150.0,
                    trend_percent: Some(50.0),
                },
            ]
        );
    }

    #[test]
    fn empty_input_is_zero_valued() {
        let s = summarize(&[]).unwrap();
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.estimated_savings, 0.0);
        assert!(s.by_provider.is_empty());
        assert!(s.top_services.is_empty());
        assert!(s.monthly_series.is_empty());
        assert!(s.provider_shares().is_empty());
    }

    #[test]
    fn savings_use_named_rate() {
        let s = summarize(&[rec("2024-01-01", "AWS", "S3", 200.0)]).unwrap();
        assert!((s.estimated_savings - 200.0 * ESTIMATED_SAVINGS_RATE).abs() < 1e-9);

        let opts = SummaryOptions {
            savings_rate: 0.5,
            ..Default::default()
        };
        let s = summarize_with(&[rec("2024-01-01", "AWS", "S3", 200.0)], &opts).unwrap();
        assert_eq!(s.estimated_savings, 100.0);
    }

    #[test]
    fn provider_totals_conserve_total_cost() {
        let records = vec![
            rec("2024-01-01", "AWS", "S3", 0.1),
            rec("2024-01-02", "GCP", "GCS", 0.2),
            rec("2024-01-03", "AWS", "EC2", 0.3),
            rec("2024-02-03", "Azure", "Blob", 12.75),
        ];
        let s = summarize(&records).unwrap();
        assert_eq!(s.by_provider.len(), 3);
        let sum: f64 = s.by_provider.values().sum();
        assert!((sum - s.total_cost).abs() < 1e-9);
    }

    #[test]
    fn top_services_are_ranked_truncated_and_stable_on_ties() {
        let records = vec![
            rec("2024-01-01", "AWS", "A", 10.0),
            rec("2024-01-01", "AWS", "B", 30.0),
            rec("2024-01-01", "AWS", "C", 10.0),
            rec("2024-01-01", "AWS", "D", 5.0),
            rec("2024-01-01", "AWS", "E", 1.0),
            rec("2024-01-01", "AWS", "F", 2.0),
            rec("2024-01-01", "AWS", "A", 0.0),
        ];
        let top = top_services(&records, TOP_SERVICES_LIMIT);
        let names: Vec<_> = top.iter().map(|s| s.service.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D", "F"]);
        assert!(top.windows(2).all(|w| w[0].cost >= w[1].cost));

        let few = top_services(&records[..2], TOP_SERVICES_LIMIT);
        assert_eq!(few.len(), 2);
    }

    #[test]
    fn zero_predecessor_month_has_no_trend() {
        let records = vec![
            rec("2024-01-01", "AWS", "S3", 0.0),
            rec("2024-02-01", "AWS", "S3", 40.0),
            rec("2024-03-01", "AWS", "S3", 30.0),
        ];
        let series = monthly_series(&records);
        assert_eq!(series[0].trend_percent, None);
        assert_eq!(series[1].trend_percent, None);
        assert_eq!(series[2].trend_percent, Some(-25.0));
    }

    #[test]
    fn trend_is_rounded_to_one_decimal() {
        assert_eq!(trend_percent(3.0, 4.0), Some(33.3));
        assert_eq!(trend_percent(0.0, 4.0), None);
    }

    #[test]
    fn monthly_series_is_sorted_by_month() {
        let records = vec![
            rec("2024-03-05", "AWS", "S3", 1.0),
            rec("2023-11-05", "AWS", "S3", 1.0),
            rec("2024-01-05", "AWS", "S3", 1.0),
            rec("2024-03-20", "AWS", "S3", 1.0),
        ];
        let months: Vec<_> = monthly_series(&records)
            .into_iter()
            .map(|p| (p.month, p.total_cost))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2023-11".to_string(), 1.0),
                ("2024-01".to_string(), 1.0),
                ("2024-03".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn provider_shares_are_undefined_for_zero_total() {
        let s = summarize(&[rec("2024-01-01", "AWS", "S3", 0.0)]).unwrap();
        let shares = s.provider_shares();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].percent, None);

        let s = summarize(&[
            rec("2024-01-01", "AWS", "S3", 75.0),
            rec("2024-01-01", "GCP", "GCS", 25.0),
        ])
        .unwrap();
        let percents: Vec<_> = s.provider_shares().into_iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![Some(75.0), Some(25.0)]);
    }

    #[test]
    fn malformed_record_fails_fast() {
        let records = vec![
            rec("2024-01-01", "AWS", "S3", 1.0),
            rec("2024-01-01", "AWS", "S3", f64::NAN),
        ];
        let err = summarize(&records).unwrap_err();
        assert!(matches!(err, SpendError::MalformedRecord { row: 1, .. }));
    }
}
