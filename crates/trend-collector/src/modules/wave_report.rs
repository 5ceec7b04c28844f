//! 파동 데이터 리포트 모듈.
//!
//! 일자별 파동 데이터 파일을 읽어 형태 코드별 요약, 종목 목록,
//! 차트용 종가 시계열을 만듭니다.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use trend_core::{DirectionCounts, Price, PriceHistoryStore, TrendError, TrendResult};
use trend_data::{AvailableDates, WaveDataRepository, WaveEntry, WaveSnapshot};

/// 형태 코드별 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub pattern_type: String,
    /// 해당 코드의 종목 수
    pub count: usize,
    #[serde(flatten)]
    pub directions: DirectionCounts,
}

/// 하루치 파동 데이터 요약.
#[derive(Debug, Clone, Serialize)]
pub struct WaveSummary {
    pub date: NaiveDate,
    pub patterns: Vec<PatternSummary>,
    pub total_stocks: usize,
}

/// 형태 코드의 종목 목록.
#[derive(Debug, Clone, Serialize)]
pub struct WaveTickers {
    pub date: NaiveDate,
    pub pattern_type: String,
    pub count: usize,
    pub tickers: Vec<WaveEntry>,
}

/// 종목 하나의 차트 시계열.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<Price>,
}

/// 형태 코드의 차트 데이터.
#[derive(Debug, Clone, Serialize)]
pub struct WaveChart {
    pub date: NaiveDate,
    pub pattern_type: String,
    pub total_tickers: usize,
    pub displayed_tickers: usize,
    pub series: Vec<ChartSeries>,
}

/// 사용 가능한 파동 데이터 날짜를 조회합니다.
pub async fn wave_dates(repo: &WaveDataRepository) -> TrendResult<AvailableDates> {
    Ok(repo.available_dates().await?)
}

/// 파동 데이터를 로드합니다. 파일이 없으면 `NotFound`.
pub async fn load_snapshot(
    repo: &WaveDataRepository,
    date: Option<NaiveDate>,
) -> TrendResult<WaveSnapshot> {
    match repo.load(date).await? {
        Some(snapshot) => Ok(snapshot),
        None => {
            let target = date.map_or_else(|| "latest".to_string(), |d| d.to_string());
            warn!(dir = %repo.dir().display(), date = %target, "파동 데이터 없음");
            Err(TrendError::NotFound(format!("파동 데이터: {}", target)))
        }
    }
}

/// 형태 코드별 종목 수와 방향 개수를 집계합니다.
///
/// 종목 수 내림차순, 같으면 코드 오름차순으로 정렬합니다.
pub fn pattern_summary(snapshot: &WaveSnapshot) -> WaveSummary {
    let mut patterns: Vec<PatternSummary> = snapshot
        .patterns
        .iter()
        .map(|(code, entries)| PatternSummary {
            pattern_type: code.clone(),
            count: entries.len(),
            directions: DirectionCounts::of(code),
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.pattern_type.cmp(&b.pattern_type))
    });

    WaveSummary {
        date: snapshot.date,
        patterns,
        total_stocks: snapshot.total_stocks(),
    }
}

/// 형태 코드의 종목 목록 (없으면 빈 목록).
pub fn pattern_tickers(snapshot: &WaveSnapshot, code: &str) -> WaveTickers {
    let tickers = snapshot.entries(code).to_vec();
    WaveTickers {
        date: snapshot.date,
        pattern_type: code.to_string(),
        count: tickers.len(),
        tickers,
    }
}

/// 형태 코드의 앞쪽 `max_tickers`개 종목의 전체 종가 시계열을 조회합니다.
#[instrument(skip(snapshot, store), fields(date = %snapshot.date))]
pub async fn pattern_chart_data<H: PriceHistoryStore>(
    snapshot: &WaveSnapshot,
    code: &str,
    store: &H,
    max_tickers: usize,
) -> TrendResult<WaveChart> {
    let entries = snapshot.entries(code);
    let mut series = Vec::with_capacity(entries.len().min(max_tickers));

    for entry in entries.iter().take(max_tickers) {
        let history = store.history(&entry.ticker).await?;
        let (dates, closes) = history.iter().map(|p| (p.trade_date, p.close)).unzip();
        series.push(ChartSeries {
            ticker: entry.ticker.clone(),
            dates,
            closes,
        });
    }

    debug!(
        total = entries.len(),
        displayed = series.len(),
        "차트 데이터 조회 완료"
    );

    Ok(WaveChart {
        date: snapshot.date,
        pattern_type: code.to_string(),
        total_tickers: entries.len(),
        displayed_tickers: series.len(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry(ticker: &str) -> WaveEntry {
        WaveEntry {
            ticker: ticker.to_string(),
            extra: Default::default(),
        }
    }

    fn snapshot() -> WaveSnapshot {
        let mut patterns = BTreeMap::new();
        patterns.insert("332".to_string(), vec![entry("A"), entry("B")]);
        patterns.insert("111".to_string(), vec![entry("C")]);
        patterns.insert("123".to_string(), vec![entry("D"), entry("E")]);
        WaveSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            patterns,
        }
    }

    #[test]
    fn test_pattern_summary_sorted_by_count() {
        let summary = pattern_summary(&snapshot());

        assert_eq!(summary.total_stocks, 5);
        let codes: Vec<_> = summary
            .patterns
            .iter()
            .map(|p| p.pattern_type.as_str())
            .collect();
        assert_eq!(codes, vec!["123", "332", "111"]);

        let first = &summary.patterns[1];
        assert_eq!(first.directions.up_count, 2);
        assert_eq!(first.directions.down_count, 1);
        assert_eq!(first.directions.flat_count, 0);
        assert_eq!(summary.patterns[2].directions.flat_count, 3);
    }

    #[test]
    fn test_summary_json_is_flat() {
        let summary = pattern_summary(&snapshot());
        let json = serde_json::to_value(&summary.patterns[0]).unwrap();
        assert_eq!(json["pattern_type"], "123");
        assert_eq!(json["count"], 2);
        assert_eq!(json["up_count"], 1);
    }

    #[test]
    fn test_pattern_tickers() {
        let tickers = pattern_tickers(&snapshot(), "332");
        assert_eq!(tickers.count, 2);
        assert_eq!(tickers.tickers[0].ticker, "A");

        assert_eq!(pattern_tickers(&snapshot(), "222").count, 0);
    }
}
