//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 일봉 가격 관련 타입을 정의합니다:
//! - `PricePoint` - 외부에서 적재된 일봉 OHLCV 데이터
//! - `MovingAverages` - 적재 시 함께 계산된 이동평균 (`ma_1..ma_3`)
//! - `KlinePeriod` / `KlineBar` - 일/주/월 단위 K선 집계
//! - `ClosePoint` - 종가 시계열 포인트

use crate::error::TrendError;
use crate::types::{Price, Volume};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 일봉 가격 데이터.
///
/// 가격 이력 저장소에서 읽어 오며, 한번 기록되면 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 종목 코드
    pub ticker: String,
    /// 거래일
    pub trade_date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
    /// 전일 대비 변동 (적재 데이터에 없으면 `None`)
    #[serde(default)]
    pub change_price: Option<Price>,
    /// 이동평균
    #[serde(flatten)]
    pub ma: MovingAverages,
}

/// 일봉에 함께 적재되는 이동평균 3종.
///
/// 값의 기간은 적재 배치가 정하며 여기서는 해석하지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingAverages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_1: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_2: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_3: Option<Price>,
}

impl MovingAverages {
    pub fn is_empty(&self) -> bool {
        self.ma_1.is_none() && self.ma_2.is_none() && self.ma_3.is_none()
    }
}

impl PricePoint {
    /// 새 일봉을 생성합니다.
    pub fn new(
        ticker: impl Into<String>,
        trade_date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            trade_date,
            open,
            high,
            low,
            close,
            volume,
            change_price: None,
            ma: MovingAverages::default(),
        }
    }

    /// 변동폭과 이동평균을 설정합니다.
    pub fn with_indicators(mut self, change_price: Option<Price>, ma: MovingAverages) -> Self {
        self.change_price = change_price;
        self.ma = ma;
        self
    }

    /// 종가만 있는 일봉을 생성합니다 (OHLC 모두 종가).
    pub fn from_close(ticker: impl Into<String>, trade_date: NaiveDate, close: Price) -> Self {
        Self::new(ticker, trade_date, close, close, close, close, Volume::ZERO)
    }
}

/// 종가 시계열 포인트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: Price,
}

impl From<&PricePoint> for ClosePoint {
    fn from(point: &PricePoint) -> Self {
        Self {
            date: point.trade_date,
            close: point.close,
        }
    }
}

/// K선 집계 단위.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlinePeriod {
    /// 일봉
    #[default]
    Daily,
    /// 주봉 (월요일 시작)
    Weekly,
    /// 월봉 (1일 시작)
    Monthly,
}

impl KlinePeriod {
    /// 거래일이 속한 구간의 시작일을 반환합니다.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            KlinePeriod::Daily => date,
            KlinePeriod::Weekly => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            KlinePeriod::Monthly => date.with_day(1).unwrap_or(date),
        }
    }
}

impl fmt::Display for KlinePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KlinePeriod::Daily => "daily",
            KlinePeriod::Weekly => "weekly",
            KlinePeriod::Monthly => "monthly",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for KlinePeriod {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "1d" => Ok(KlinePeriod::Daily),
            "weekly" | "1w" => Ok(KlinePeriod::Weekly),
            "monthly" | "1mo" => Ok(KlinePeriod::Monthly),
            _ => Err(TrendError::InvalidParameter(format!(
                "지원하지 않는 K선 주기: {}",
                s
            ))),
        }
    }
}

/// 집계된 K선 봉.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineBar {
    /// 구간 시작일
    pub period_start: NaiveDate,
    /// 구간 첫 거래일 시가
    pub open: Price,
    /// 구간 최고가
    pub high: Price,
    /// 구간 최저가
    pub low: Price,
    /// 구간 마지막 거래일 종가
    pub close: Price,
    /// 구간 거래량 합계
    pub volume: Volume,
    /// 이동평균. 일봉에만 채워집니다.
    #[serde(flatten)]
    pub ma: MovingAverages,
}

impl KlineBar {
    fn open_with(period: KlinePeriod, point: &PricePoint) -> Self {
        let ma = match period {
            KlinePeriod::Daily => point.ma,
            KlinePeriod::Weekly | KlinePeriod::Monthly => MovingAverages::default(),
        };
        Self {
            period_start: period.period_start(point.trade_date),
            open: point.open,
            high: point.high,
            low: point.low,
            close: point.close,
            volume: point.volume,
            ma,
        }
    }

    fn absorb(&mut self, point: &PricePoint) {
        self.high = self.high.max(point.high);
        self.low = self.low.min(point.low);
        self.close = point.close;
        self.volume += point.volume;
    }
}

/// 일봉을 주기별 K선으로 집계합니다.
///
/// 입력은 거래일 오름차순이어야 합니다. 시가는 구간 첫 거래일, 종가는
/// 구간 마지막 거래일 값을 사용합니다.
pub fn aggregate_klines(points: &[PricePoint], period: KlinePeriod) -> Vec<KlineBar> {
    let mut bars: Vec<KlineBar> = Vec::new();

    for point in points {
        let start = period.period_start(point.trade_date);
        match bars.last_mut() {
            Some(bar) if bar.period_start == start => bar.absorb(point),
            _ => bars.push(KlineBar::open_with(period, point)),
        }
    }

    bars
}
