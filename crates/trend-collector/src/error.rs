//! 에러 타입 정의.

use std::fmt;
use trend_core::TrendError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러 (환경변수 누락/형식 오류)
    Config(String),
    /// 형태 생성/조회 에러
    Pattern(TrendError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Pattern(e) => write!(f, "Pattern error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<TrendError> for CollectorError {
    fn from(err: TrendError) -> Self {
        Self::Pattern(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
