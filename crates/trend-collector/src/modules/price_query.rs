//! 가격 이력 조회 모듈.
//!
//! 종목 목록, 종가 시계열, 일/주/월 K선을 제공합니다.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use trend_core::{
    aggregate_klines, ClosePoint, KlineBar, KlinePeriod, PriceHistoryStore, TrendError,
    TrendResult,
};

/// 종가 시계열 기본 조회 기간 (일)
pub const DEFAULT_CLOSE_DAYS: i64 = 30;

/// K선 기본 조회 기간 (일)
pub const DEFAULT_KLINE_DAYS: i64 = 365;

/// 조회 기간 (양 끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 지정되지 않은 끝을 채웁니다.
    ///
    /// 종료일 기본값은 `today`, 시작일 기본값은 종료일 `default_days`일 전입니다.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        default_days: i64,
        today: NaiveDate,
    ) -> TrendResult<Self> {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or(end - Duration::days(default_days));

        if start > end {
            return Err(TrendError::InvalidParameter(format!(
                "시작일이 종료일보다 늦습니다: {} > {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }
}

/// 종가 시계열 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct CloseSeries {
    pub ticker: String,
    pub range: DateRange,
    pub data: Vec<ClosePoint>,
}

/// K선 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct KlineSeries {
    pub ticker: String,
    pub period: String,
    pub range: DateRange,
    pub data: Vec<KlineBar>,
}

fn require_ticker(ticker: &str) -> TrendResult<()> {
    if ticker.trim().is_empty() {
        return Err(TrendError::InvalidParameter("종목 코드가 비어 있습니다".into()));
    }
    Ok(())
}

/// 이력이 있는 종목 목록 (오름차순).
pub async fn list_tickers<H: PriceHistoryStore>(store: &H) -> TrendResult<Vec<String>> {
    let tickers = store.tickers().await?;
    debug!(count = tickers.len(), "종목 목록 조회");
    Ok(tickers)
}

/// 기간 내 종가 시계열을 조회합니다 (거래일 오름차순).
#[instrument(skip(store))]
pub async fn close_series<H: PriceHistoryStore>(
    store: &H,
    ticker: &str,
    range: DateRange,
) -> TrendResult<CloseSeries> {
    require_ticker(ticker)?;

    let history = store.history_between(ticker, range.start, range.end).await?;
    debug!(points = history.len(), "종가 시계열 조회");

    Ok(CloseSeries {
        ticker: ticker.to_string(),
        range,
        data: history.iter().map(ClosePoint::from).collect(),
    })
}

/// 기간 내 일봉을 주기별 K선으로 집계합니다.
#[instrument(skip(store))]
pub async fn kline<H: PriceHistoryStore>(
    store: &H,
    ticker: &str,
    period: KlinePeriod,
    range: DateRange,
) -> TrendResult<KlineSeries> {
    require_ticker(ticker)?;

    let history = store.history_between(ticker, range.start, range.end).await?;
    let bars = aggregate_klines(&history, period);
    debug!(points = history.len(), bars = bars.len(), "K선 조회");

    Ok(KlineSeries {
        ticker: ticker.to_string(),
        period: period.to_string(),
        range,
        data: bars,
    })
}
