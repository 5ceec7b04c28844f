//! `stock_history` 테이블 기반 가격 이력 저장소.
//!
//! 가격 이력은 외부에서 적재되며 이 저장소는 읽기만 합니다.

use crate::error::{DataError, Result};
use crate::storage::database::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use tracing::{debug, instrument};
use trend_core::{MovingAverages, PriceHistoryStore, PricePoint, TrendResult};

/// 일봉 이력 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct StockHistoryRecord {
    pub ticker: String,
    pub trade_date: NaiveDate,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub close_price: Decimal,
    pub volume: Decimal,
    pub change_price: Option<Decimal>,
    pub ma_1: Option<Decimal>,
    pub ma_2: Option<Decimal>,
    pub ma_3: Option<Decimal>,
}

impl From<StockHistoryRecord> for PricePoint {
    fn from(r: StockHistoryRecord) -> Self {
        PricePoint::new(
            r.ticker,
            r.trade_date,
            r.open_price,
            r.high_price,
            r.low_price,
            r.close_price,
            r.volume,
        )
        .with_indicators(
            r.change_price,
            MovingAverages {
                ma_1: r.ma_1,
                ma_2: r.ma_2,
                ma_3: r.ma_3,
            },
        )
    }
}

/// PostgreSQL 가격 이력 저장소.
#[derive(Clone)]
pub struct PgPriceHistoryStore {
    db: Database,
}

impl PgPriceHistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn fetch_tickers(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT ticker
            FROM stock_history
            ORDER BY ticker
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(DataError::from)?;

        Ok(rows.into_iter().map(|(t,)| t).collect())
    }

    async fn fetch_history(&self, ticker: &str) -> Result<Vec<StockHistoryRecord>> {
        sqlx::query_as(
            r#"
            SELECT ticker, trade_date, open_price, high_price, low_price, close_price, volume,
                   change_price, ma_1, ma_2, ma_3
            FROM stock_history
            WHERE ticker = $1
            ORDER BY trade_date ASC
            "#,
        )
        .bind(ticker)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }

    async fn fetch_history_between(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StockHistoryRecord>> {
        sqlx::query_as(
            r#"
            SELECT ticker, trade_date, open_price, high_price, low_price, close_price, volume,
                   change_price, ma_1, ma_2, ma_3
            FROM stock_history
            WHERE ticker = $1 AND trade_date BETWEEN $2 AND $3
            ORDER BY trade_date ASC
            "#,
        )
        .bind(ticker)
        .bind(start)
        .bind(end)
        .fetch_all(self.db.pool())
        .await
        .map_err(Into::into)
    }
}

#[async_trait]
impl PriceHistoryStore for PgPriceHistoryStore {
    #[instrument(skip(self))]
    async fn tickers(&self) -> TrendResult<Vec<String>> {
        let tickers = self.fetch_tickers().await?;
        debug!(count = tickers.len(), "종목 목록 조회");
        Ok(tickers)
    }

    #[instrument(skip(self))]
    async fn history(&self, ticker: &str) -> TrendResult<Vec<PricePoint>> {
        let records = self.fetch_history(ticker).await?;
        Ok(records.into_iter().map(PricePoint::from).collect())
    }

    #[instrument(skip(self))]
    async fn history_between(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TrendResult<Vec<PricePoint>> {
        let records = self.fetch_history_between(ticker, start, end).await?;
        Ok(records.into_iter().map(PricePoint::from).collect())
    }
}
