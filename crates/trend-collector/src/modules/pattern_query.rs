//! 등락 형태 조회 모듈.
//!
//! 저장된 형태 레코드를 코드별로 조회하거나 코드별 개수를 집계합니다.
//! 두 조회 모두 지원하지 않는 윈도우 크기는 `InvalidParameter`로 거부합니다.

use serde::Serialize;
use tracing::{debug, instrument};

use trend_core::{
    validate_code, PatternConfig, PatternStore, PatternTypeCount, TrendPattern, TrendResult,
};
use trend_data::{Database, PgPatternStore};

use crate::Result;

/// 형태 코드별 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct PatternsByType {
    pub days: usize,
    pub pattern_type: String,
    pub count: usize,
    pub data: Vec<TrendPattern>,
}

/// 형태 코드 통계 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct PatternTypeCounts {
    pub days: usize,
    /// 전체 레코드 수
    pub total: i64,
    pub data: Vec<PatternTypeCount>,
}

/// 윈도우 크기와 형태 코드로 레코드를 조회합니다 (종료일 내림차순).
#[instrument(skip(store, config))]
pub async fn patterns_by_type<S: PatternStore>(
    store: &S,
    config: &PatternConfig,
    days: usize,
    code: &str,
) -> TrendResult<PatternsByType> {
    let window = config.window(days)?;
    validate_code(code, window)?;

    let data = store.find_by_code(window, code).await?;
    debug!(count = data.len(), "형태 코드 조회 완료");

    Ok(PatternsByType {
        days: window.days(),
        pattern_type: code.to_string(),
        count: data.len(),
        data,
    })
}

/// 윈도우 크기별 형태 코드 개수 (개수 내림차순, 코드 오름차순).
#[instrument(skip(store, config))]
pub async fn pattern_type_counts<S: PatternStore>(
    store: &S,
    config: &PatternConfig,
    days: usize,
) -> TrendResult<PatternTypeCounts> {
    let window = config.window(days)?;

    let data = store.code_counts(window).await?;
    let total: i64 = data.iter().map(|c| c.count).sum();
    debug!(codes = data.len(), total, "형태 코드 통계 조회 완료");

    Ok(PatternTypeCounts {
        days: window.days(),
        total,
        data,
    })
}

/// PostgreSQL 저장소에서 형태 코드별 레코드를 조회합니다.
pub async fn query_patterns(
    db: &Database,
    config: &PatternConfig,
    days: usize,
    code: &str,
) -> Result<PatternsByType> {
    let store = PgPatternStore::new(db.clone());
    Ok(patterns_by_type(&store, config, days, code).await?)
}

/// PostgreSQL 저장소에서 형태 코드 통계를 조회합니다.
pub async fn query_pattern_types(
    db: &Database,
    config: &PatternConfig,
    days: usize,
) -> Result<PatternTypeCounts> {
    let store = PgPatternStore::new(db.clone());
    Ok(pattern_type_counts(&store, config, days).await?)
}
