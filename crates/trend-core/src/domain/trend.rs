//! 등락 형태(trend pattern) 분류.
//!
//! 연속된 종가를 한 칸씩 비교하여 상승/보합/하락으로 분류하고,
//! 각 단계를 한 자리 코드로 이어 붙인 형태 코드를 만듭니다.
//!
//! | 방향 | 코드 | 조건 |
//! |------|------|------|
//! | 상승 | `3` | 다음 종가 > 현재 종가 |
//! | 보합 | `1` | 다음 종가 = 현재 종가 |
//! | 하락 | `2` | 다음 종가 < 현재 종가 |
//!
//! 보합 판정은 Decimal 정확 비교이며 허용 오차를 두지 않습니다.

use crate::domain::PricePoint;
use crate::error::{TrendError, TrendResult};
use crate::types::{Price, WindowSize};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 하루 단위 등락 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// 상승
    #[serde(alias = "涨")]
    Up,
    /// 보합
    #[serde(alias = "平")]
    Flat,
    /// 하락
    #[serde(alias = "跌")]
    Down,
}

impl TrendDirection {
    /// 두 종가 사이의 등락 방향을 판정합니다.
    pub fn between(close: Price, next_close: Price) -> Self {
        match next_close.cmp(&close) {
            Ordering::Greater => TrendDirection::Up,
            Ordering::Equal => TrendDirection::Flat,
            Ordering::Less => TrendDirection::Down,
        }
    }

    /// 형태 코드 문자.
    pub fn code_char(self) -> char {
        match self {
            TrendDirection::Up => '3',
            TrendDirection::Flat => '1',
            TrendDirection::Down => '2',
        }
    }

    /// 형태 코드 문자에서 방향을 복원합니다.
    pub fn from_code_char(c: char) -> Option<Self> {
        match c {
            '3' => Some(TrendDirection::Up),
            '1' => Some(TrendDirection::Flat),
            '2' => Some(TrendDirection::Down),
            _ => None,
        }
    }

    /// 라벨 문자열.
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Flat => "flat",
            TrendDirection::Down => "down",
        }
    }
}

/// 형태 상세의 한 단계 (하루 비교).
///
/// JSON 상세 컬럼에는 `day, close, next_close, diff, trend, code` 키로 저장됩니다.
/// 가격은 JSON 숫자로 기록하고, 읽을 때는 숫자와 문자열을 모두 받습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendStep {
    /// 윈도우 내 단계 번호 (1부터)
    #[serde(rename = "day")]
    pub day_index: usize,
    /// 기준 종가
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub close: Price,
    /// 다음 거래일 종가
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub next_close: Price,
    /// 종가 차이 (next_close - close)
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub diff: Price,
    /// 등락 방향
    #[serde(rename = "trend")]
    pub label: TrendDirection,
    /// 형태 코드 문자
    #[serde(rename = "code")]
    pub code_char: char,
}

impl TrendStep {
    /// 두 종가로 단계를 생성합니다.
    pub fn new(day_index: usize, close: Price, next_close: Price) -> Self {
        let label = TrendDirection::between(close, next_close);
        Self {
            day_index,
            close,
            next_close,
            diff: next_close - close,
            label,
            code_char: label.code_char(),
        }
    }
}

/// 형태 레코드의 고유 키 (종목, 종료일, 윈도우 크기).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    pub ticker: String,
    pub end_date: NaiveDate,
    pub window_size: WindowSize,
}

/// 등락 형태 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPattern {
    /// 종목 코드
    pub ticker: String,
    /// 윈도우 크기 (일)
    #[serde(rename = "days")]
    pub window_size: WindowSize,
    /// 윈도우 마지막 거래일
    #[serde(rename = "pattern_date")]
    pub end_date: NaiveDate,
    /// 형태 코드 (예: "132")
    #[serde(rename = "pattern_type")]
    pub code: String,
    /// 단계별 상세
    pub detail: Vec<TrendStep>,
}

impl TrendPattern {
    /// 윈도우(`window_size + 1`개 연속 일봉)로 형태 레코드를 생성합니다.
    ///
    /// 윈도우 길이가 맞지 않으면 `None`을 반환합니다.
    pub fn from_window(window_size: WindowSize, window: &[PricePoint]) -> Option<Self> {
        if window.len() != window_size.points() {
            return None;
        }
        let last = window.last()?;

        let detail: Vec<TrendStep> = window
            .windows(2)
            .enumerate()
            .map(|(j, pair)| TrendStep::new(j + 1, pair[0].close, pair[1].close))
            .collect();
        let code: String = detail.iter().map(|step| step.code_char).collect();

        Some(Self {
            ticker: last.ticker.clone(),
            window_size,
            end_date: last.trade_date,
            code,
            detail,
        })
    }

    /// 고유 키를 반환합니다.
    pub fn key(&self) -> PatternKey {
        PatternKey {
            ticker: self.ticker.clone(),
            end_date: self.end_date,
            window_size: self.window_size,
        }
    }

    /// 코드와 상세가 서로 일치하는지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        self.code.chars().count() == self.window_size.days()
            && self.detail.len() == self.window_size.days()
            && self
                .code
                .chars()
                .zip(&self.detail)
                .enumerate()
                .all(|(j, (c, step))| {
                    step.day_index == j + 1
                        && step.code_char == c
                        && step.diff == step.next_close - step.close
                        && step.label == TrendDirection::between(step.close, step.next_close)
                        && step.label.code_char() == c
                })
    }
}

/// 종가 목록을 형태 코드로 변환합니다.
pub fn classify_closes(closes: &[Price]) -> String {
    closes
        .windows(2)
        .map(|pair| TrendDirection::between(pair[0], pair[1]).code_char())
        .collect()
}

/// 한 종목의 전체 이력(거래일 오름차순)에서 슬라이딩 윈도우 형태를 생성합니다.
///
/// 이력이 `window_size + 1`개 미만이면 빈 목록을 반환합니다.
/// 그 외에는 정확히 `len - window_size`개의 레코드를 반환합니다.
pub fn build_patterns(history: &[PricePoint], window_size: WindowSize) -> Vec<TrendPattern> {
    history
        .windows(window_size.points())
        .filter_map(|window| TrendPattern::from_window(window_size, window))
        .collect()
}

/// 형태 코드의 방향별 개수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts {
    pub up_count: usize,
    pub down_count: usize,
    pub flat_count: usize,
}

impl DirectionCounts {
    /// 형태 코드에서 상승(`3`)/하락(`2`)/보합(`1`) 문자 수를 셉니다.
    pub fn of(code: &str) -> Self {
        code.chars()
            .filter_map(TrendDirection::from_code_char)
            .fold(Self::default(), |mut acc, direction| {
                match direction {
                    TrendDirection::Up => acc.up_count += 1,
                    TrendDirection::Down => acc.down_count += 1,
                    TrendDirection::Flat => acc.flat_count += 1,
                }
                acc
            })
    }
}

/// 조회용 형태 코드를 검증합니다.
///
/// 코드 길이는 윈도우 크기와 같아야 하며 `1`, `2`, `3`만 허용됩니다.
pub fn validate_code(code: &str, window_size: WindowSize) -> TrendResult<()> {
    if code.chars().count() != window_size.days() {
        return Err(TrendError::InvalidParameter(format!(
            "형태 코드 길이 불일치: '{}' (윈도우 {})",
            code, window_size
        )));
    }
    if let Some(bad) = code
        .chars()
        .find(|c| TrendDirection::from_code_char(*c).is_none())
    {
        return Err(TrendError::InvalidParameter(format!(
            "잘못된 형태 코드 문자 '{}': {}",
            bad, code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn history(ticker: &str, closes: &[Price]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint::from_close(ticker, start + chrono::Duration::days(i as i64), *c))
            .collect()
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(TrendDirection::between(dec!(10), dec!(12)), TrendDirection::Up);
        assert_eq!(TrendDirection::between(dec!(12), dec!(11)), TrendDirection::Down);
        assert_eq!(TrendDirection::between(dec!(10), dec!(10)), TrendDirection::Flat);
        // 스케일이 달라도 값이 같으면 보합
        assert_eq!(TrendDirection::between(dec!(10.00), dec!(10)), TrendDirection::Flat);
        // 아주 작은 차이도 보합이 아님
        assert_eq!(TrendDirection::between(dec!(10.0000), dec!(10.0001)), TrendDirection::Up);
    }

    #[test]
    fn test_classify_closes() {
        assert_eq!(classify_closes(&[dec!(10), dec!(10), dec!(12), dec!(11)]), "132");
        assert_eq!(classify_closes(&[dec!(10)]), "");
        assert_eq!(classify_closes(&[]), "");
    }

    #[test]
    fn test_build_patterns_single_window() {
        let points = history("AAA", &[dec!(10), dec!(10), dec!(12), dec!(11)]);
        let patterns = build_patterns(&points, WindowSize::THREE_DAYS);

        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.ticker, "AAA");
        assert_eq!(p.end_date, points[3].trade_date);
        assert_eq!(p.code, "132");
        assert_eq!(p.detail[0].diff, dec!(0));
        assert_eq!(p.detail[0].label, TrendDirection::Flat);
        assert_eq!(p.detail[1].diff, dec!(2));
        assert_eq!(p.detail[1].label, TrendDirection::Up);
        assert_eq!(p.detail[2].diff, dec!(-1));
        assert_eq!(p.detail[2].label, TrendDirection::Down);
        assert_eq!(p.detail[2].day_index, 3);
        assert!(p.is_consistent());
    }

    #[test]
    fn test_build_patterns_short_history() {
        let points = history("BBB", &[dec!(10), dec!(11)]);
        assert!(build_patterns(&points, WindowSize::FIVE_DAYS).is_empty());
        assert!(build_patterns(&[], WindowSize::THREE_DAYS).is_empty());
    }

    #[test]
    fn test_build_patterns_sliding_count() {
        let closes: Vec<Price> = (0..10).map(|i| Price::from(i % 3)).collect();
        let points = history("CCC", &closes);
        let patterns = build_patterns(&points, WindowSize::FIVE_DAYS);
        assert_eq!(patterns.len(), 5);
        assert_eq!(patterns[0].end_date, points[5].trade_date);
        assert_eq!(patterns[4].end_date, points[9].trade_date);
    }

    #[test]
    fn test_step_json_shape() {
        let step = TrendStep::new(1, dec!(10), dec!(12));
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["day"], 1);
        assert_eq!(json["trend"], "up");
        assert_eq!(json["code"], "3");

        assert_eq!(json["close"], 10.0);
        assert_eq!(json["diff"], 2.0);

        let back: TrendStep = serde_json::from_value(json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_step_reads_legacy_rows() {
        let raw = r#"[
            {"day": 1, "close": 10.0, "next_close": 10.0, "diff": 0.0, "trend": "平", "code": "1"},
            {"day": 2, "close": 10.0, "next_close": 12.5, "diff": 2.5, "trend": "涨", "code": "3"},
            {"day": 3, "close": "12.5", "next_close": "11", "diff": "-1.5", "trend": "跌", "code": "2"}
        ]"#;

        let steps: Vec<TrendStep> = serde_json::from_str(raw).unwrap();
        assert_eq!(steps[0].label, TrendDirection::Flat);
        assert_eq!(steps[1].label, TrendDirection::Up);
        assert_eq!(steps[1].next_close, dec!(12.5));
        assert_eq!(steps[2].label, TrendDirection::Down);
        assert_eq!(steps[2].diff, dec!(-1.5));
        assert_eq!(steps[2], TrendStep::new(3, dec!(12.5), dec!(11)));
    }

    #[test]
    fn test_inconsistent_pattern_detected() {
        let points = history("AAA", &[dec!(10), dec!(10), dec!(12), dec!(11)]);
        let mut p = build_patterns(&points, WindowSize::THREE_DAYS).remove(0);
        p.code = "133".to_string();
        assert!(!p.is_consistent());
    }

    #[test]
    fn test_direction_counts() {
        let counts = DirectionCounts::of("33121");
        assert_eq!(counts.up_count, 2);
        assert_eq!(counts.flat_count, 2);
        assert_eq!(counts.down_count, 1);
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("132", WindowSize::THREE_DAYS).is_ok());
        assert!(validate_code("13", WindowSize::THREE_DAYS).is_err());
        assert!(validate_code("134", WindowSize::THREE_DAYS).is_err());
    }
}
