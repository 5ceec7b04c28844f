//! 등락 형태 분석의 에러 타입.
//!
//! 이 모듈은 워크스페이스 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum TrendError {
    /// 잘못된 파라미터 (지원하지 않는 윈도우 크기, 형태 코드 등)
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 저장소 읽기/쓰기 실패
    #[error("저장소 사용 불가: {0}")]
    StoreUnavailable(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 등락 형태 작업을 위한 Result 타입.
pub type TrendResult<T> = Result<T, TrendError>;

impl TrendError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 생성기는 자동 재시도를 하지 않으며, 호출자가 판단할 때 사용합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrendError::StoreUnavailable(_))
    }
}

impl From<serde_json::Error> for TrendError {
    fn from(err: serde_json::Error) -> Self {
        TrendError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for TrendError {
    fn from(err: config::ConfigError) -> Self {
        TrendError::Config(err.to_string())
    }
}
