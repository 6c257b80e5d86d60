//! Printable report summary and related text projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SpendResult;
use crate::processing::aggregate::total_cost;
use crate::types::{validate_records, SpendRecord};

/// Static advisory printed at the bottom of every report.
pub const REPORT_ADVISORY: &str = "Top Tip: Check anomalies for quick wins!";

/// The four values a printable report is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_cost: f64,
    pub row_count: usize,
    pub anomaly_count: usize,
    pub message: String,
}

impl ReportSummary {
    /// Report body, one entry per printed line.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Spend Summary: ${:.2}", self.total_cost),
            format!(
                "Filtered: {} rows | Anomalies: {}",
                self.row_count, self.anomaly_count
            ),
            self.message.clone(),
        ]
    }
}

/// Summarize `records` for a printable report.
pub fn to_report_summary(records: &[SpendRecord]) -> SpendResult<ReportSummary> {
    validate_records(records)?;
    Ok(ReportSummary {
        total_cost: total_cost(records),
        row_count: records.len(),
        anomaly_count: records.iter().filter(|r| r.anomaly).count(),
        message: REPORT_ADVISORY.to_string(),
    })
}

/// Download name for a CSV export produced on `day`.
pub fn csv_file_name(day: NaiveDate) -> String {
    format!("cloud-spend-{}.csv", day.format("%Y-%m-%d"))
}

/// Download name for a report produced on `day`.
pub fn report_file_name(day: NaiveDate) -> String {
    format!("spend-report-{}.pdf", day.format("%Y-%m-%d"))
}

/// One-sentence description of a record for a detail view.
pub fn describe_record(r: &SpendRecord) -> String {
    format!(
        "This is {} {} spend from the {} team in {} environment.",
        r.cloud_provider, r.service, r.team, r.env
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cost: f64, anomaly: bool) -> SpendRecord {
        SpendRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            "GCP",
            "BigQuery",
            "data",
            "staging",
            cost,
            anomaly,
        )
    }

    #[test]
    fn report_counts_rows_and_anomalies() {
        let s = to_report_summary(&[rec(10.0, true), rec(5.5, false), rec(1.25, true)]).unwrap();
        assert_eq!(s.total_cost, 16.75);
        assert_eq!(s.row_count, 3);
        assert_eq!(s.anomaly_count, 2);
        assert_eq!(s.message, REPORT_ADVISORY);
        assert_eq!(
            s.lines(),
            [
                "Spend Summary: $16.75".to_string(),
                "Filtered: 3 rows | Anomalies: 2".to_string(),
                REPORT_ADVISORY.to_string(),
            ]
        );
    }

    #[test]
    fn report_of_empty_set_is_zeroed() {
        let s = to_report_summary(&[]).unwrap();
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.row_count, 0);
        assert_eq!(s.anomaly_count, 0);
        assert_eq!(s.lines()[0], "Spend Summary: $0.00");
    }

    #[test]
    fn file_names_carry_the_date() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(csv_file_name(day), "cloud-spend-2024-12-01.csv");
        assert_eq!(report_file_name(day), "spend-report-2024-12-01.pdf");
    }

    #[test]
    fn describe_record_names_every_dimension() {
        assert_eq!(
            describe_record(&rec(1.0, false)),
            "This is GCP BigQuery spend from the data team in staging environment."
        );
    }
}
