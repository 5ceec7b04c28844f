//! 등락 형태 윈도우 크기 정의.

use crate::error::{TrendError, TrendResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 등락 형태의 윈도우 크기 (비교 일수).
///
/// `days`일의 등락을 계산하려면 `days + 1`개의 연속 종가가 필요합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct WindowSize(usize);

impl WindowSize {
    /// 3일 형태
    pub const THREE_DAYS: WindowSize = WindowSize(3);
    /// 5일 형태
    pub const FIVE_DAYS: WindowSize = WindowSize(5);

    /// 최대 윈도우 크기. 형태 코드 컬럼(`VARCHAR(10)`) 길이와 같습니다.
    pub const MAX_DAYS: usize = 10;

    /// 새 윈도우 크기를 생성합니다. `1..=MAX_DAYS`만 허용합니다.
    pub fn new(days: usize) -> TrendResult<Self> {
        if !(1..=Self::MAX_DAYS).contains(&days) {
            return Err(TrendError::InvalidParameter(format!(
                "윈도우 크기는 1~{}일이어야 합니다: {}",
                Self::MAX_DAYS,
                days
            )));
        }
        Ok(Self(days))
    }

    /// 비교 일수 (형태 코드 길이).
    pub fn days(self) -> usize {
        self.0
    }

    /// 한 윈도우에 필요한 가격 포인트 수.
    pub fn points(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

impl TryFrom<usize> for WindowSize {
    type Error = TrendError;

    fn try_from(days: usize) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl TryFrom<i32> for WindowSize {
    type Error = TrendError;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        let days = usize::try_from(days)
            .map_err(|_| TrendError::InvalidParameter(format!("음수 윈도우 크기: {}", days)))?;
        Self::new(days)
    }
}

impl From<WindowSize> for usize {
    fn from(window: WindowSize) -> Self {
        window.0
    }
}

impl From<WindowSize> for i32 {
    fn from(window: WindowSize) -> Self {
        // new()가 MAX_DAYS 이하만 허용하므로 변환은 실패하지 않습니다.
        i32::try_from(window.0).unwrap_or(i32::MAX)
    }
}

impl FromStr for WindowSize {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days: usize = s
            .trim()
            .trim_end_matches('d')
            .parse()
            .map_err(|_| TrendError::InvalidParameter(format!("잘못된 윈도우 크기: {}", s)))?;
        Self::new(days)
    }
}
