use cloud_spend_pipeline::SpendError;
use cloud_spend_pipeline::ingestion::csv::ingest_csv_from_path;
use cloud_spend_pipeline::ingestion::json::{ingest_json_from_path, ingest_json_from_str};

#[test]
fn ingest_json_array_from_path_matches_csv_fixture() {
    let from_json = ingest_json_from_path("tests/fixtures/spend.json").unwrap();
    let from_csv = ingest_csv_from_path("tests/fixtures/spend.csv").unwrap();

    assert_eq!(from_json.len(), 5);
    assert_eq!(from_json, from_csv);
}

#[test]
fn ingest_json_ndjson_happy_path() {
    let input = r#"
{"date":"2024-01-15","cloud_provider":"AWS","service":"S3","team":"core","env":"prod","cost_usd":100,"anomaly":false}
{"date":"2024-02-10","cloudProvider":"GCP","service":"GCS","team":"data","env":"prod","costUsd":"7.50","anomaly":true}
"#;
    let records = ingest_json_from_str(input).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].cloud_provider, "GCP");
    assert_eq!(records[1].cost_usd, 7.5);
    assert!(records[1].anomaly);
}

#[test]
fn ingest_json_empty_array_is_empty_dataset() {
    assert!(ingest_json_from_str("[]").unwrap().is_empty());
}

#[test]
fn ingest_json_errors_on_blank_input() {
    let msg = ingest_json_from_str("   ").unwrap_err().to_string();
    assert!(msg.contains("json input is empty"));
}

#[test]
fn ingest_json_errors_on_missing_field() {
    let input = r#"[{"date":"2024-01-15","cloud_provider":"AWS","service":"S3","team":"core","env":"prod","cost_usd":1}]"#;
    let msg = ingest_json_from_str(input).unwrap_err().to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required field 'anomaly'"));
}

#[test]
fn ingest_json_errors_on_negative_cost() {
    let input = r#"[{"date":"2024-01-15","cloud_provider":"AWS","service":"S3","team":"core","env":"prod","cost_usd":-4.5,"anomaly":false}]"#;
    let err = ingest_json_from_str(input).unwrap_err();
    match err {
        SpendError::MalformedRecord { row, field, .. } => {
            assert_eq!(row, 1);
            assert_eq!(field, "cost_usd");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ingest_json_errors_on_non_object_row() {
    let msg = ingest_json_from_str("[1, 2]").unwrap_err().to_string();
    assert!(msg.contains("row 1 is not a json object"));
}

#[test]
fn ingest_json_errors_on_undecodable_ndjson_line() {
    let input = concat!(
        r#"{"date":"2024-01-15","cloud_provider":"AWS","service":"S3","team":"core","env":"prod","cost_usd":1,"anomaly":false}"#,
        "\n",
        r#"{"date":"2024-01-16","cloud_provider":"AWS""#,
        "\n",
    );
    let err = ingest_json_from_str(input).unwrap_err();
    match err {
        SpendError::Json(e) => assert_eq!(e.line(), 2),
        other => panic!("unexpected error: {other}"),
    }
}
