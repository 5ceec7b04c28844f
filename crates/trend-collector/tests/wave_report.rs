//! 파동 데이터 리포트 통합 테스트.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::fs;

use trend_collector::modules::{
    load_snapshot, pattern_chart_data, pattern_summary, pattern_tickers, wave_dates,
};
use trend_core::{PricePoint, TrendError};
use trend_data::{MemoryPriceHistoryStore, WaveDataRepository};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn wave_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("2024-06-03.json"),
        r#"{"332": [{"ticker": "AAA"}], "111": [{"ticker": "BBB"}, {"ticker": "CCC"}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("2024-06-04.json"),
        r#"{
            "323": [{"ticker": "AAA", "close": 12.5}, {"ticker": "BBB"}, {"ticker": "CCC"}],
            "222": [{"ticker": "DDD"}]
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[tokio::test]
async fn test_latest_snapshot_summary() {
    let dir = wave_dir();
    let repo = WaveDataRepository::new(dir.path());

    let dates = wave_dates(&repo).await.unwrap();
    assert_eq!(dates.dates, vec![date(2024, 6, 3), date(2024, 6, 4)]);
    assert_eq!(dates.latest, Some(date(2024, 6, 4)));

    let snapshot = load_snapshot(&repo, None).await.unwrap();
    let summary = pattern_summary(&snapshot);

    assert_eq!(summary.date, date(2024, 6, 4));
    assert_eq!(summary.total_stocks, 4);
    assert_eq!(summary.patterns[0].pattern_type, "323");
    assert_eq!(summary.patterns[0].count, 3);
    assert_eq!(summary.patterns[0].directions.up_count, 2);
    assert_eq!(summary.patterns[0].directions.down_count, 1);
    assert_eq!(summary.patterns[1].directions.down_count, 3);
}

#[tokio::test]
async fn test_snapshot_by_date_and_tickers() {
    let dir = wave_dir();
    let repo = WaveDataRepository::new(dir.path());

    let snapshot = load_snapshot(&repo, Some(date(2024, 6, 3))).await.unwrap();
    let tickers = pattern_tickers(&snapshot, "111");
    assert_eq!(tickers.count, 2);
    assert_eq!(tickers.tickers[1].ticker, "CCC");

    let err = load_snapshot(&repo, Some(date(2024, 6, 5))).await.unwrap_err();
    assert!(matches!(err, TrendError::NotFound(_)));
}

#[tokio::test]
async fn test_empty_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = WaveDataRepository::new(dir.path());

    assert!(wave_dates(&repo).await.unwrap().latest.is_none());
    let err = load_snapshot(&repo, None).await.unwrap_err();
    assert!(matches!(err, TrendError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_file_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("2024-06-03.json"), "{not json").unwrap();
    let repo = WaveDataRepository::new(dir.path());

    let err = load_snapshot(&repo, None).await.unwrap_err();
    assert!(matches!(err, TrendError::Serialization(_)));
}

#[tokio::test]
async fn test_chart_data_limits_tickers() {
    let dir = wave_dir();
    let repo = WaveDataRepository::new(dir.path());
    let snapshot = load_snapshot(&repo, None).await.unwrap();

    let store = MemoryPriceHistoryStore::with_points(vec![
        PricePoint::from_close("AAA", date(2024, 6, 3), dec!(12)),
        PricePoint::from_close("AAA", date(2024, 6, 4), dec!(12.5)),
        PricePoint::from_close("BBB", date(2024, 6, 4), dec!(7)),
    ]);

    let chart = pattern_chart_data(&snapshot, "323", &store, 2).await.unwrap();
    assert_eq!(chart.total_tickers, 3);
    assert_eq!(chart.displayed_tickers, 2);
    assert_eq!(chart.series[0].ticker, "AAA");
    assert_eq!(chart.series[0].dates, vec![date(2024, 6, 3), date(2024, 6, 4)]);
    assert_eq!(chart.series[0].closes, vec![dec!(12), dec!(12.5)]);
    assert_eq!(chart.series[1].closes, vec![dec!(7)]);

    let missing = pattern_chart_data(&snapshot, "111", &store, 50).await.unwrap();
    assert_eq!(missing.total_tickers, 0);
    assert!(missing.series.is_empty());
}
