use transit_health::analyzers::runner::{AnalysisRunner, Provenance};
use transit_health::infra::csv_source::CsvPingSource;
use transit_health::output::{NO_DATA, render_report};
use transit_health::services::sources::PingSource;
use transit_health::snapshot::Snapshot;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_pings.csv");

#[tokio::test]
async fn test_full_pipeline() {
    let mut runner = AnalysisRunner::new(None, Box::new(CsvPingSource::new(FIXTURE)));
    let sections = runner.run_all().await;

    assert_eq!(sections.len(), 4);
    assert!(sections.iter().all(|s| s.provenance == Provenance::Local));

    let interval = &sections[0].table.rows;
    assert_eq!(interval, &vec![vec!["1001", "S", "inbound", "T1 -> T2", "1.6 min"]]);

    let dwell = &sections[1].table.rows;
    assert_eq!(dwell, &vec![vec!["1001", "S", "T3", "42.0s"]]);

    let turnaround = &sections[2].table.rows;
    assert_eq!(turnaround, &vec![vec!["1001", "Terminal", "T5", "300s"]]);

    let congestion = &sections[3].table.rows;
    assert_eq!(congestion, &vec![vec!["T6", "Terminal", "B", "departed", "express"]]);

    let report = render_report(&sections);
    assert!(!report.contains(NO_DATA));
    for section in &sections {
        assert!(report.contains(&format!("[{}]", section.table.title)));
    }
}

#[tokio::test]
async fn test_malformed_rows_are_dropped_not_fatal() {
    let rows = CsvPingSource::new(FIXTURE).query_raw(1500).await.unwrap();
    let snapshot = Snapshot::from_rows(rows);
    assert_eq!(snapshot.dropped, 1);
    assert_eq!(snapshot.len(), 11);
}

#[tokio::test]
async fn test_missing_archive_reports_no_data_everywhere() {
    let source = CsvPingSource::new("tests/fixtures/does_not_exist.csv");
    let mut runner = AnalysisRunner::new(None, Box::new(source));
    let sections = runner.run_all().await;

    assert_eq!(sections.len(), 4);
    let report = render_report(&sections);
    assert_eq!(report.matches(NO_DATA).count(), 4);
}

#[tokio::test]
async fn test_small_snapshot_size_limits_every_metric() {
    // The three newest pings: T5 at the terminal, T4's departure and T2's arrival.
    let mut runner = AnalysisRunner::new(None, Box::new(CsvPingSource::new(FIXTURE)))
        .with_snapshot_size(Some(3));
    let sections = runner.run_all().await;

    assert!(sections[0].table.rows.is_empty());
    assert!(sections[1].table.rows.is_empty());
    assert_eq!(sections[2].table.rows[0][3], "0s");
}

#[tokio::test]
async fn test_congestion_sees_newest_state_in_unsorted_archive() {
    // T6 sits near the top of the file, but its 08:00:20 ping is among the
    // seven newest by timestamp.
    let mut runner = AnalysisRunner::new(None, Box::new(CsvPingSource::new(FIXTURE)))
        .with_snapshot_size(Some(7));
    let sections = runner.run_all().await;

    assert_eq!(
        sections[3].table.rows,
        vec![vec!["T6", "Terminal", "B", "departed", "express"]]
    );
}
