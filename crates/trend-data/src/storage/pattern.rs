//! `stock_trend_pattern` 테이블 기반 등락 형태 저장소.
//!
//! 업서트는 하나의 트랜잭션에서 수행되어 전부 반영되거나 전부 롤백됩니다.

use crate::error::{DataError, Result};
use crate::storage::database::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::{debug, info, instrument};
use trend_core::{
    PatternStore, PatternTypeCount, TrendPattern, TrendResult, TrendStep, UpsertSummary,
    WindowSize,
};

/// 한 번의 UNNEST 업서트에 담는 최대 레코드 수.
const UPSERT_CHUNK_SIZE: usize = 500;

/// 등락 형태 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct TrendPatternRecord {
    pub ticker: String,
    pub pattern_date: NaiveDate,
    pub days: i32,
    pub pattern_type: String,
    pub pattern_detail: Json<Vec<TrendStep>>,
}

impl TrendPatternRecord {
    /// TrendPattern 도메인 객체로 변환.
    pub fn into_pattern(self) -> Result<TrendPattern> {
        let window_size = WindowSize::try_from(self.days)
            .map_err(|e| DataError::InvalidData(e.to_string()))?;

        Ok(TrendPattern {
            ticker: self.ticker,
            window_size,
            end_date: self.pattern_date,
            code: self.pattern_type,
            detail: self.pattern_detail.0,
        })
    }
}

/// PostgreSQL 등락 형태 저장소.
#[derive(Clone)]
pub struct PgPatternStore {
    db: Database,
}

impl PgPatternStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 모든 레코드를 하나의 트랜잭션으로 업서트합니다.
    ///
    /// `RETURNING (xmax = 0)`으로 삽입/갱신 여부를 구분합니다.
    async fn upsert_in_transaction(&self, patterns: &[TrendPattern]) -> Result<UpsertSummary> {
        let mut summary = UpsertSummary::default();
        if patterns.is_empty() {
            return Ok(summary);
        }

        let mut tx = self.db.pool().begin().await?;

        // UNNEST 패턴으로 일괄 업서트 (N+1 쿼리 방지)
        for chunk in patterns.chunks(UPSERT_CHUNK_SIZE) {
            let tickers: Vec<&str> = chunk.iter().map(|p| p.ticker.as_str()).collect();
            let dates: Vec<NaiveDate> = chunk.iter().map(|p| p.end_date).collect();
            let days: Vec<i32> = chunk.iter().map(|p| i32::from(p.window_size)).collect();
            let codes: Vec<&str> = chunk.iter().map(|p| p.code.as_str()).collect();
            let details: Vec<serde_json::Value> = chunk
                .iter()
                .map(|p| serde_json::to_value(&p.detail))
                .collect::<std::result::Result<_, _>>()?;

            let inserted_flags: Vec<(bool,)> = sqlx::query_as(
                r#"
                INSERT INTO stock_trend_pattern
                    (ticker, pattern_date, days, pattern_type, pattern_detail, created_at, updated_at)
                SELECT t.ticker, t.pattern_date, t.days, t.pattern_type, t.pattern_detail, NOW(), NOW()
                FROM UNNEST(
                    $1::text[], $2::date[], $3::int4[], $4::text[], $5::jsonb[]
                ) AS t(ticker, pattern_date, days, pattern_type, pattern_detail)
                ON CONFLICT (ticker, pattern_date, days) DO UPDATE SET
                    pattern_type = EXCLUDED.pattern_type,
                    pattern_detail = EXCLUDED.pattern_detail,
                    updated_at = NOW()
                RETURNING (xmax = 0) AS inserted
                "#,
            )
            .bind(&tickers)
            .bind(&dates)
            .bind(&days)
            .bind(&codes)
            .bind(&details)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

            for (inserted,) in inserted_flags {
                if inserted {
                    summary.created += 1;
                } else {
                    summary.updated += 1;
                }
            }

            debug!(chunk = chunk.len(), "형태 청크 업서트");
        }

        tx.commit().await?;

        info!(
            created = summary.created,
            updated = summary.updated,
            "등락 형태 저장 완료"
        );

        Ok(summary)
    }

    async fn fetch_by_code(&self, days: i32, code: &str) -> Result<Vec<TrendPatternRecord>> {
        sqlx::query_as(
            r#"
            SELECT ticker, pattern_date, days, pattern_type, pattern_detail
            FROM stock_trend_pattern
            WHERE days = $1 AND pattern_type = $2
            ORDER BY pattern_date DESC, ticker ASC
            "#,
        )
        .bind(days)
        .bind(code)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    async fn fetch_code_counts(&self, days: i32) -> Result<Vec<(String, i64)>> {
        sqlx::query_as(
            r#"
            SELECT pattern_type, COUNT(*) AS cnt
            FROM stock_trend_pattern
            WHERE days = $1
            GROUP BY pattern_type
            ORDER BY cnt DESC, pattern_type ASC
            "#,
        )
        .bind(days)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }
}

#[async_trait]
impl PatternStore for PgPatternStore {
    #[instrument(skip(self, patterns), fields(count = patterns.len()))]
    async fn upsert_all(&self, patterns: &[TrendPattern]) -> TrendResult<UpsertSummary> {
        Ok(self.upsert_in_transaction(patterns).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_code(
        &self,
        window_size: WindowSize,
        code: &str,
    ) -> TrendResult<Vec<TrendPattern>> {
        let records = self.fetch_by_code(i32::from(window_size), code).await?;
        let patterns = records
            .into_iter()
            .map(TrendPatternRecord::into_pattern)
            .collect::<Result<Vec<_>>>()?;
        Ok(patterns)
    }

    #[instrument(skip(self))]
    async fn code_counts(&self, window_size: WindowSize) -> TrendResult<Vec<PatternTypeCount>> {
        let rows = self.fetch_code_counts(i32::from(window_size)).await?;
        Ok(rows
            .into_iter()
            .map(|(pattern_type, count)| PatternTypeCount {
                pattern_type,
                count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_into_pattern() {
        let record = TrendPatternRecord {
            ticker: "AAA".to_string(),
            pattern_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            days: 3,
            pattern_type: "132".to_string(),
            pattern_detail: Json(vec![
                TrendStep::new(1, dec!(10), dec!(10)),
                TrendStep::new(2, dec!(10), dec!(12)),
                TrendStep::new(3, dec!(12), dec!(11)),
            ]),
        };

        let pattern = record.into_pattern().unwrap();
        assert_eq!(pattern.window_size, WindowSize::THREE_DAYS);
        assert!(pattern.is_consistent());
    }

    #[test]
    fn test_record_with_bad_days_rejected() {
        let record = TrendPatternRecord {
            ticker: "AAA".to_string(),
            pattern_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            days: 0,
            pattern_type: String::new(),
            pattern_detail: Json(vec![]),
        };

        assert!(matches!(
            record.into_pattern(),
            Err(DataError::InvalidData(_))
        ));
    }
}
