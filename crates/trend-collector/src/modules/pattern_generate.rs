//! 등락 형태 생성 모듈.
//!
//! 모든 종목의 일봉 이력에 `days + 1` 크기의 슬라이딩 윈도우를 적용하여
//! 등락 형태 레코드를 만들고, (종목, 종료일, 윈도우) 키로 업서트합니다.
//!
//! # 동작
//! 1. 윈도우 크기 검증 (지원 목록 외에는 아무 작업도 하지 않음)
//! 2. 종목 목록 조회
//! 3. 종목별 전체 이력을 거래일 오름차순으로 조회하여 형태 계산
//! 4. 계산된 전체 레코드를 하나의 원자적 업서트로 저장
//!
//! 조회 중 하나라도 실패하면 저장 단계에 도달하지 않으므로 형태 저장소는
//! 변경되지 않습니다. 저장 실패는 트랜잭션 롤백으로 처리됩니다.

use std::time::Instant;
use tracing::{debug, info, Instrument};

use trend_core::{
    build_patterns, PatternConfig, PatternStore, PriceHistoryStore, TrendError, TrendPattern,
    TrendResult, WindowSize,
};
use trend_data::{Database, PgPatternStore, PgPriceHistoryStore};

use crate::config::CollectorConfig;
use crate::stats::GenerationStats;
use crate::Result;

/// 등락 형태 생성기.
pub struct TrendPatternGenerator<H, P> {
    history: H,
    patterns: P,
    config: PatternConfig,
}

impl<H, P> TrendPatternGenerator<H, P>
where
    H: PriceHistoryStore,
    P: PatternStore,
{
    /// 새 생성기를 만듭니다.
    pub fn new(history: H, patterns: P, config: PatternConfig) -> Self {
        Self {
            history,
            patterns,
            config,
        }
    }

    pub fn pattern_store(&self) -> &P {
        &self.patterns
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// 지정 윈도우 크기로 전체 종목의 형태를 생성하고 저장합니다.
    pub async fn generate(&self, days: usize) -> TrendResult<GenerationStats> {
        let window = self.config.window(days)?;
        let span = trend_core::pattern_span!("generate_patterns", window);

        async move {
            let start = Instant::now();
            let mut stats = GenerationStats::new(window.days());

            info!("등락 형태 생성 시작");

            let patterns = self.compute(window, &mut stats).await?;
            let summary = self.patterns.upsert_all(&patterns).await?;
            stats.apply(summary);

            stats.elapsed = start.elapsed();
            Ok::<_, TrendError>(stats)
        }
        .instrument(span)
        .await
    }

    /// 지원하는 모든 윈도우 크기에 대해 순서대로 생성합니다.
    ///
    /// 윈도우 크기마다 별도의 원자적 저장 단위입니다.
    pub async fn generate_all(&self) -> TrendResult<Vec<GenerationStats>> {
        let mut results = Vec::new();
        for window in self.config.supported_windows()? {
            results.push(self.generate(window.days()).await?);
        }
        Ok(results)
    }

    /// 저장하지 않고 전체 형태 레코드를 계산합니다.
    pub async fn compute(
        &self,
        window: WindowSize,
        stats: &mut GenerationStats,
    ) -> TrendResult<Vec<TrendPattern>> {
        let tickers = self.history.tickers().await?;
        info!(tickers = tickers.len(), "종목 목록 조회 완료");

        let mut patterns = Vec::new();

        for (idx, ticker) in tickers.iter().enumerate() {
            let history = self.history.history(ticker).await?;
            let ticker_patterns = build_patterns(&history, window);

            stats.tickers += 1;
            if ticker_patterns.is_empty() {
                stats.short_history += 1;
                debug!(
                    ticker = %ticker,
                    points = history.len(),
                    required = window.points(),
                    "이력 부족, 건너뜀"
                );
            } else {
                debug!(
                    ticker = %ticker,
                    points = history.len(),
                    windows = ticker_patterns.len(),
                    "형태 계산"
                );
            }

            if (idx + 1) % 500 == 0 {
                info!(
                    progress = format!("{}/{}", idx + 1, tickers.len()),
                    "형태 계산 진행 중"
                );
            }

            stats.windows += ticker_patterns.len();
            patterns.extend(ticker_patterns);
        }

        Ok(patterns)
    }
}

/// PostgreSQL 저장소로 등락 형태를 생성합니다.
///
/// # 인자
/// * `db` - 데이터베이스 연결
/// * `config` - Collector 설정
/// * `days` - 윈도우 크기 (지원 목록 내)
pub async fn generate_patterns(
    db: &Database,
    config: &CollectorConfig,
    days: usize,
) -> Result<GenerationStats> {
    let generator = pg_generator(db, config);
    Ok(generator.generate(days).await?)
}

/// PostgreSQL 저장소로 지원하는 모든 윈도우 크기의 형태를 생성합니다.
pub async fn generate_all_patterns(
    db: &Database,
    config: &CollectorConfig,
) -> Result<Vec<GenerationStats>> {
    let generator = pg_generator(db, config);
    Ok(generator.generate_all().await?)
}

fn pg_generator(
    db: &Database,
    config: &CollectorConfig,
) -> TrendPatternGenerator<PgPriceHistoryStore, PgPatternStore> {
    TrendPatternGenerator::new(
        PgPriceHistoryStore::new(db.clone()),
        PgPatternStore::new(db.clone()),
        config.pattern.clone(),
    )
}
