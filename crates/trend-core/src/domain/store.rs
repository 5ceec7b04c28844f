//! 가격 이력 / 등락 형태 저장소 trait 및 관련 타입.
//!
//! 생성기와 조회 모듈은 이 trait에만 의존합니다. PostgreSQL 구현과
//! 메모리 구현은 `trend-data` 크레이트에 있습니다.

use crate::domain::{PricePoint, TrendPattern};
use crate::error::TrendResult;
use crate::types::WindowSize;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 업서트 결과 집계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertSummary {
    /// 새로 삽입된 레코드 수
    pub created: usize,
    /// 덮어쓴 레코드 수
    pub updated: usize,
}

impl UpsertSummary {
    /// 전체 처리 레코드 수.
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// 형태 코드별 레코드 수.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTypeCount {
    /// 형태 코드
    pub pattern_type: String,
    /// 레코드 수
    pub count: i64,
}

/// 가격 이력 저장소 (읽기 전용).
///
/// 외부에서 적재되며 이 크레이트들은 쓰지 않습니다.
#[async_trait]
pub trait PriceHistoryStore: Send + Sync {
    /// 이력이 있는 모든 종목 코드 (오름차순, 중복 없음).
    async fn tickers(&self) -> TrendResult<Vec<String>>;

    /// 종목의 전체 이력 (거래일 오름차순).
    async fn history(&self, ticker: &str) -> TrendResult<Vec<PricePoint>>;

    /// 종목의 기간 이력 (양 끝 포함, 거래일 오름차순).
    async fn history_between(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TrendResult<Vec<PricePoint>>;
}

/// 등락 형태 저장소.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// (종목, 종료일, 윈도우) 키로 모든 레코드를 원자적으로 업서트합니다.
    ///
    /// 전부 반영되거나 하나도 반영되지 않아야 합니다.
    async fn upsert_all(&self, patterns: &[TrendPattern]) -> TrendResult<UpsertSummary>;

    /// 윈도우 크기와 형태 코드로 조회합니다 (종료일 내림차순).
    async fn find_by_code(&self, window_size: WindowSize, code: &str)
        -> TrendResult<Vec<TrendPattern>>;

    /// 윈도우 크기별 형태 코드 통계 (개수 내림차순, 코드 오름차순).
    async fn code_counts(&self, window_size: WindowSize) -> TrendResult<Vec<PatternTypeCount>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_summary_total() {
        let summary = UpsertSummary {
            created: 3,
            updated: 4,
        };
        assert_eq!(summary.total(), 7);
        assert_eq!(UpsertSummary::default().total(), 0);
    }
}
