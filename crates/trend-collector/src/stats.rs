//! 형태 생성 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use trend_core::UpsertSummary;

/// 형태 생성 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// 윈도우 크기 (일)
    pub days: usize,
    /// 처리한 종목 수
    pub tickers: usize,
    /// 이력 부족으로 윈도우가 없는 종목 수
    pub short_history: usize,
    /// 생성된 윈도우 수
    pub windows: usize,
    /// 새로 삽입된 레코드 수
    pub created: usize,
    /// 덮어쓴 레코드 수
    pub updated: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl GenerationStats {
    /// 새 통계 객체 생성
    pub fn new(days: usize) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// 업서트 결과 반영
    pub fn apply(&mut self, summary: UpsertSummary) {
        self.created = summary.created;
        self.updated = summary.updated;
    }

    /// 업서트 결과 요약
    pub fn summary(&self) -> UpsertSummary {
        UpsertSummary {
            created: self.created,
            updated: self.updated,
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            days = self.days,
            tickers = self.tickers,
            short_history = self.short_history,
            windows = self.windows,
            created = self.created,
            updated = self.updated,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "형태 생성 완료"
        );
    }
}
