//! 등락 형태 생성 속성 테스트
//!
//! 임의의 종가 이력에 대해 윈도우 수와 코드/상세 일치를 검증합니다.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use trend_core::{build_patterns, classify_closes, PricePoint, TrendDirection, WindowSize};

fn history_from(closes: &[i64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            PricePoint::from_close(
                "PROP",
                start + Duration::days(i as i64),
                Decimal::new(*c, 2),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn window_count_matches_history_length(
        closes in prop::collection::vec(0i64..500, 0..40),
        days in prop::sample::select(vec![3usize, 5]),
    ) {
        let window = WindowSize::new(days).unwrap();
        let points = history_from(&closes);
        let patterns = build_patterns(&points, window);

        let expected = closes.len().saturating_sub(days);
        prop_assert_eq!(patterns.len(), expected);
    }

    #[test]
    fn code_matches_detail(
        closes in prop::collection::vec(0i64..20, 6..30),
        days in prop::sample::select(vec![3usize, 5]),
    ) {
        let window = WindowSize::new(days).unwrap();
        let points = history_from(&closes);

        for (i, pattern) in build_patterns(&points, window).iter().enumerate() {
            prop_assert!(pattern.is_consistent());
            prop_assert_eq!(pattern.code.len(), days);
            prop_assert_eq!(pattern.end_date, points[i + days].trade_date);

            for (j, step) in pattern.detail.iter().enumerate() {
                prop_assert_eq!(step.close, points[i + j].close);
                prop_assert_eq!(step.next_close, points[i + j + 1].close);
                let expected = if step.next_close > step.close {
                    '3'
                } else if step.next_close < step.close {
                    '2'
                } else {
                    '1'
                };
                prop_assert_eq!(step.code_char, expected);
            }

            let closes_in_window: Vec<Decimal> =
                points[i..=i + days].iter().map(|p| p.close).collect();
            prop_assert_eq!(&classify_closes(&closes_in_window), &pattern.code);
        }
    }
}

#[test]
fn test_scenario_flat_up_down() {
    let points = history_from(&[1000, 1000, 1200, 1100]);
    let patterns = build_patterns(&points, WindowSize::THREE_DAYS);

    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].code, "132");
    assert_eq!(patterns[0].end_date, points[3].trade_date);

    let labels: Vec<TrendDirection> = patterns[0].detail.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        vec![TrendDirection::Flat, TrendDirection::Up, TrendDirection::Down]
    );
}
