//! Core data model types for the spend pipeline.
//!
//! Records are produced once at the ingestion boundary and are never mutated afterwards;
//! every pipeline stage takes `&[SpendRecord]` and returns freshly built values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{SpendError, SpendResult};

/// One cloud cost line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendRecord {
    /// Calendar day the cost was incurred on.
    pub date: NaiveDate,
    /// Provider label, e.g. `AWS` or `GCP`.
    #[serde(alias = "cloud_provider")]
    pub cloud_provider: String,
    /// Service identifier, e.g. `S3`.
    pub service: String,
    /// Owning team.
    pub team: String,
    /// Deployment environment, e.g. `prod` or `staging`.
    pub env: String,
    /// Cost in US dollars. Must be finite and non-negative.
    #[serde(alias = "cost_usd")]
    pub cost_usd: f64,
    /// Externally computed anomaly flag.
    pub anomaly: bool,
}

impl SpendRecord {
    /// Create a record. No validation happens here; see [`SpendRecord::validate`].
    pub fn new(
        date: NaiveDate,
        cloud_provider: impl Into<String>,
        service: impl Into<String>,
        team: impl Into<String>,
        env: impl Into<String>,
        cost_usd: f64,
        anomaly: bool,
    ) -> Self {
        Self {
            date,
            cloud_provider: cloud_provider.into(),
            service: service.into(),
            team: team.into(),
            env: env.into(),
            cost_usd,
            anomaly,
        }
    }

    /// `YYYY-MM` bucket used by month filtering and the monthly series.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Check the record invariants, reporting `row` in the error on failure.
    pub fn validate(&self, row: usize) -> SpendResult<()> {
        if !self.cost_usd.is_finite() || self.cost_usd < 0.0 {
            return Err(SpendError::MalformedRecord {
                row,
                field: SortField::CostUsd.as_str().to_string(),
                raw: self.cost_usd.to_string(),
                message: "cost must be a finite, non-negative number".to_string(),
            });
        }

        let text_fields = [
            (SortField::CloudProvider, &self.cloud_provider),
            (SortField::Service, &self.service),
            (SortField::Team, &self.team),
            (SortField::Env, &self.env),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() {
                return Err(SpendError::MalformedRecord {
                    row,
                    field: field.as_str().to_string(),
                    raw: value.clone(),
                    message: "expected a non-empty string".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Validate every record, failing on the first offender (0-based slice index).
pub fn validate_records(records: &[SpendRecord]) -> SpendResult<()> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(idx, record)| record.validate(idx))
}

/// Active filter selection. `None`, `"All"` and `""` all mean no restriction for the
/// categorical fields, however the criteria were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// `YYYY-MM` month to keep.
    pub month: Option<String>,
    /// Exact provider to keep.
    pub cloud_provider: Option<String>,
    /// Exact team to keep.
    pub team: Option<String>,
    /// Exact environment to keep.
    pub env: Option<String>,
    /// Case-insensitive substring matched against service or team. Empty = inactive.
    pub search_text: String,
}

/// Sentinel used by callers for "no restriction" on a categorical filter.
pub const ALL: &str = "All";

impl FilterCriteria {
    /// Criteria that keep every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = selection(month.into());
        self
    }

    pub fn with_cloud_provider(mut self, provider: impl Into<String>) -> Self {
        self.cloud_provider = selection(provider.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = selection(team.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = selection(env.into());
        self
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Build criteria from `(key, value)` pairs, e.g. a query string or UI state.
    ///
    /// Accepted keys: `month`, `cloudProvider` (`cloud_provider`, `cloud`), `team`, `env`,
    /// `searchText` (`search_text`, `search`). A value of `All` or an empty string leaves the
    /// filter inactive. Any other key is rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> SpendResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Self::all();
        for (key, value) in pairs {
            criteria = match key.as_ref() {
                "month" => criteria.with_month(value),
                "cloudProvider" | "cloud_provider" | "cloud" => criteria.with_cloud_provider(value),
                "team" => criteria.with_team(value),
                "env" => criteria.with_env(value),
                "searchText" | "search_text" | "search" => criteria.with_search_text(value),
                other => {
                    return Err(SpendError::configuration(format!(
                        "unknown filter key '{other}'"
                    )));
                }
            };
        }
        Ok(criteria)
    }

    /// True if no criterion restricts the record set.
    pub fn is_unrestricted(&self) -> bool {
        active(&self.month).is_none()
            && active(&self.cloud_provider).is_none()
            && active(&self.team).is_none()
            && active(&self.env).is_none()
            && self.search_text.is_empty()
    }
}

/// The value a categorical criterion restricts to, if any.
pub fn active(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .filter(|value| !value.is_empty() && *value != ALL)
}

fn selection(value: String) -> Option<String> {
    if value.is_empty() || value == ALL {
        None
    } else {
        Some(value)
    }
}

/// Record field a view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Date,
    CloudProvider,
    Service,
    Team,
    Env,
    CostUsd,
}

impl SortField {
    /// Every sortable field, in export column order.
    pub const ALL: [SortField; 6] = [
        SortField::Date,
        SortField::CloudProvider,
        SortField::Service,
        SortField::Team,
        SortField::Env,
        SortField::CostUsd,
    ];

    /// Canonical (camelCase) field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::CloudProvider => "cloudProvider",
            SortField::Service => "service",
            SortField::Team => "team",
            SortField::Env => "env",
            SortField::CostUsd => "costUsd",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = SpendError;

    /// Accepts the camelCase names and their snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortField::Date),
            "cloudProvider" | "cloud_provider" => Ok(SortField::CloudProvider),
            "service" => Ok(SortField::Service),
            "team" => Ok(SortField::Team),
            "env" => Ok(SortField::Env),
            "costUsd" | "cost_usd" => Ok(SortField::CostUsd),
            other => Err(SpendError::configuration(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Flip the direction (column header toggle).
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = SpendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(SpendError::configuration(format!(
                "unknown sort direction '{s}'"
            ))),
        }
    }
}

/// Field + direction pair for the sort engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Spec resulting from clicking the header of `field`: toggles direction when the
    /// field is already active, otherwise starts ascending.
    pub fn clicked(self, field: SortField) -> Self {
        if self.field == field && self.direction == SortDirection::Asc {
            Self::desc(field)
        } else {
            Self::asc(field)
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::asc(SortField::Date)
    }
}

/// One bucket of the monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub total_cost: f64,
    /// Month-over-month change in percent, one decimal. `None` for the first month and
    /// whenever the previous month's total is zero.
    pub trend_percent: Option<f64>,
}

/// Summed cost of one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCost {
    pub service: String,
    pub cost: f64,
}

/// Statistics derived from a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub total_cost: f64,
    pub estimated_savings: f64,
    pub by_provider: BTreeMap<String, f64>,
    pub top_services: Vec<ServiceCost>,
    pub monthly_series: Vec<MonthlyPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cost: f64) -> SpendRecord {
        SpendRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "AWS",
            "S3",
            "core",
            "prod",
            cost,
            false,
        )
    }

    #[test]
    fn month_key_is_first_seven_chars_of_iso_date() {
        assert_eq!(record(1.0).month_key(), "2024-01");
    }

    #[test]
    fn validate_rejects_negative_and_non_finite_costs() {
        assert!(record(0.0).validate(0).is_ok());
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = record(bad).validate(3).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("row 3"), "{msg}");
            assert!(msg.contains("costUsd"), "{msg}");
        }
    }

    #[test]
    fn validate_rejects_blank_text_fields() {
        let mut r = record(1.0);
        r.team = "  ".to_string();
        let err = validate_records(&[record(1.0), r]).unwrap_err();
        match err {
            SpendError::MalformedRecord { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "team");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn filter_criteria_from_pairs_treats_all_and_empty_as_inactive() {
        let c = FilterCriteria::from_pairs([
            ("month", "All"),
            ("cloud", "GCP"),
            ("team", ""),
            ("search", "s3"),
        ])
        .unwrap();
        assert_eq!(c.month, None);
        assert_eq!(c.cloud_provider.as_deref(), Some("GCP"));
        assert_eq!(c.team, None);
        assert_eq!(c.search_text, "s3");
        assert!(!c.is_unrestricted());
        assert!(FilterCriteria::all().is_unrestricted());
    }

    #[test]
    fn deserialized_all_and_empty_values_are_inactive() {
        let c: FilterCriteria = serde_json::from_str(
            r#"{"month":"All","cloudProvider":"All","team":"","env":"All","searchText":""}"#,
        )
        .unwrap();
        assert!(c.is_unrestricted());
        assert_eq!(active(&c.month), None);
        assert_eq!(active(&c.team), None);

        let c: FilterCriteria = serde_json::from_str(r#"{"cloudProvider":"AWS"}"#).unwrap();
        assert_eq!(active(&c.cloud_provider), Some("AWS"));
        assert_eq!(c.search_text, "");
        assert!(!c.is_unrestricted());
    }

    #[test]
    fn filter_criteria_from_pairs_rejects_unknown_key() {
        let err = FilterCriteria::from_pairs([("region", "us-east-1")]).unwrap_err();
        assert!(matches!(err, SpendError::Configuration { .. }));
        assert!(err.to_string().contains("unknown filter key 'region'"));
    }

    #[test]
    fn sort_field_parses_both_spellings_and_rejects_unknown() {
        assert_eq!("costUsd".parse::<SortField>().unwrap(), SortField::CostUsd);
        assert_eq!("cost_usd".parse::<SortField>().unwrap(), SortField::CostUsd);
        assert_eq!("cloud_provider".parse::<SortField>().unwrap(), SortField::CloudProvider);
        let err = "anomaly".parse::<SortField>().unwrap_err();
        assert!(matches!(err, SpendError::Configuration { .. }));
    }

    #[test]
    fn sort_spec_header_click_toggles_direction() {
        let spec = SortSpec::default();
        assert_eq!(spec, SortSpec::asc(SortField::Date));
        let spec = spec.clicked(SortField::Date);
        assert_eq!(spec, SortSpec::desc(SortField::Date));
        let spec = spec.clicked(SortField::Date);
        assert_eq!(spec, SortSpec::asc(SortField::Date));
        assert_eq!(spec.clicked(SortField::CostUsd), SortSpec::asc(SortField::CostUsd));
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }

    #[test]
    fn spend_record_deserializes_snake_and_camel_case_keys() {
        let snake = r#"{"date":"2024-01-15","cloud_provider":"AWS","service":"S3","team":"core","env":"prod","cost_usd":1.5,"anomaly":false}"#;
        let camel = r#"{"date":"2024-01-15","cloudProvider":"AWS","service":"S3","team":"core","env":"prod","costUsd":1.5,"anomaly":false}"#;
        let a: SpendRecord = serde_json::from_str(snake).unwrap();
        let b: SpendRecord = serde_json::from_str(camel).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, record(1.5));
    }
}
