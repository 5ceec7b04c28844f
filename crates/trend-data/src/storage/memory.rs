//! 메모리 기반 저장소.
//!
//! DB 없이 생성기와 조회 로직을 실행할 때 사용합니다 (테스트, 오프라인 계산).

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use trend_core::{
    PatternKey, PatternStore, PatternTypeCount, PriceHistoryStore, PricePoint, TrendPattern,
    TrendResult, UpsertSummary, WindowSize,
};

/// 메모리 가격 이력 저장소.
///
/// 종목별로 거래일 기준 정렬 상태를 유지하며, 같은 거래일은 마지막 값으로 덮어씁니다.
#[derive(Debug, Default)]
pub struct MemoryPriceHistoryStore {
    series: RwLock<BTreeMap<String, BTreeMap<NaiveDate, PricePoint>>>,
}

impl MemoryPriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 일봉 목록으로 저장소를 생성합니다.
    pub fn with_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut series: BTreeMap<String, BTreeMap<NaiveDate, PricePoint>> = BTreeMap::new();
        for point in points {
            series
                .entry(point.ticker.clone())
                .or_default()
                .insert(point.trade_date, point);
        }
        Self {
            series: RwLock::new(series),
        }
    }

    /// 일봉을 추가합니다.
    pub async fn insert(&self, point: PricePoint) {
        self.series
            .write()
            .await
            .entry(point.ticker.clone())
            .or_default()
            .insert(point.trade_date, point);
    }
}

#[async_trait]
impl PriceHistoryStore for MemoryPriceHistoryStore {
    async fn tickers(&self) -> TrendResult<Vec<String>> {
        Ok(self.series.read().await.keys().cloned().collect())
    }

    async fn history(&self, ticker: &str) -> TrendResult<Vec<PricePoint>> {
        Ok(self
            .series
            .read()
            .await
            .get(ticker)
            .map(|days| days.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn history_between(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TrendResult<Vec<PricePoint>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .series
            .read()
            .await
            .get(ticker)
            .map(|days| days.range(start..=end).map(|(_, p)| p.clone()).collect())
            .unwrap_or_default())
    }
}

/// 메모리 등락 형태 저장소.
#[derive(Debug, Default)]
pub struct MemoryPatternStore {
    records: RwLock<BTreeMap<PatternKey, TrendPattern>>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 전체 레코드 수.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// 키 순서로 정렬된 전체 레코드 스냅샷.
    pub async fn snapshot(&self) -> Vec<TrendPattern> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn upsert_all(&self, patterns: &[TrendPattern]) -> TrendResult<UpsertSummary> {
        // 쓰기 잠금을 잡은 채 한 번에 반영하여 중간 상태가 보이지 않게 합니다.
        let mut records = self.records.write().await;
        let mut summary = UpsertSummary::default();

        for pattern in patterns {
            match records.insert(pattern.key(), pattern.clone()) {
                Some(_) => summary.updated += 1,
                None => summary.created += 1,
            }
        }

        Ok(summary)
    }

    async fn find_by_code(
        &self,
        window_size: WindowSize,
        code: &str,
    ) -> TrendResult<Vec<TrendPattern>> {
        let mut found: Vec<TrendPattern> = self
            .records
            .read()
            .await
            .values()
            .filter(|p| p.window_size == window_size && p.code == code)
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.end_date
                .cmp(&a.end_date)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        Ok(found)
    }

    async fn code_counts(&self, window_size: WindowSize) -> TrendResult<Vec<PatternTypeCount>> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for pattern in self
            .records
            .read()
            .await
            .values()
            .filter(|p| p.window_size == window_size)
        {
            *counts.entry(pattern.code.clone()).or_default() += 1;
        }

        let mut result: Vec<PatternTypeCount> = counts
            .into_iter()
            .map(|(pattern_type, count)| PatternTypeCount {
                pattern_type,
                count,
            })
            .collect();
        result.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.pattern_type.cmp(&b.pattern_type))
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[tokio::test]
    async fn test_history_sorted_and_ranged() {
        let store = MemoryPriceHistoryStore::with_points(vec![
            PricePoint::from_close("AAA", date(3), dec!(12)),
            PricePoint::from_close("AAA", date(1), dec!(10)),
            PricePoint::from_close("BBB", date(1), dec!(5)),
            PricePoint::from_close("AAA", date(2), dec!(11)),
        ]);

        assert_eq!(store.tickers().await.unwrap(), vec!["AAA", "BBB"]);

        let history = store.history("AAA").await.unwrap();
        let closes: Vec<_> = history.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![dec!(10), dec!(11), dec!(12)]);

        let ranged = store.history_between("AAA", date(2), date(3)).await.unwrap();
        assert_eq!(ranged.len(), 2);
        assert!(store.history("ZZZ").await.unwrap().is_empty());
        assert!(store
            .history_between("AAA", date(3), date(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_pattern_upsert_counts() {
        let prices = vec![
            PricePoint::from_close("AAA", date(1), dec!(10)),
            PricePoint::from_close("AAA", date(2), dec!(10)),
            PricePoint::from_close("AAA", date(3), dec!(12)),
            PricePoint::from_close("AAA", date(4), dec!(11)),
        ];
        let patterns = trend_core::build_patterns(&prices, WindowSize::THREE_DAYS);
        let store = MemoryPatternStore::new();

        let first = store.upsert_all(&patterns).await.unwrap();
        assert_eq!(first.created, 1);
        assert_eq!(first.updated, 0);

        let second = store.upsert_all(&patterns).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 1);
        assert_eq!(store.len().await, 1);

        let found = store.find_by_code(WindowSize::THREE_DAYS, "132").await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store
            .find_by_code(WindowSize::FIVE_DAYS, "132")
            .await
            .unwrap()
            .is_empty());

        let counts = store.code_counts(WindowSize::THREE_DAYS).await.unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].pattern_type, "132");
        assert_eq!(counts[0].count, 1);
    }
}
