//! tracing 구독자 초기화.
//!
//! 로그는 항상 stderr로 출력합니다. stdout은 CLI 조회 결과(JSON) 전용입니다.

use crate::error::{TrendError, TrendResult};
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로그 출력 형식 (`--log-format`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 여러 줄, 색상 포함 (개발용)
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집용)
    Json,
    /// 한 줄 텍스트
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 필터 지시자를 해석합니다 (예: `info`, `trend_collector=debug,sqlx=warn`).
///
/// `RUST_LOG`가 비어 있지 않으면 `level` 대신 사용합니다.
pub fn log_filter(level: &str) -> TrendResult<EnvFilter> {
    let directives = std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| TrendError::Config(format!("잘못된 로그 필터 '{}': {}", directives, e)))
}

/// CLI 로그 레벨/형식으로 전역 구독자를 설치합니다.
pub fn init_logging(level: &str, format: LogFormat) -> TrendResult<()> {
    let filter = log_filter(level)?;
    let layer = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    };
    installed.map_err(|e| TrendError::Config(format!("로깅 초기화 실패: {}", e)))
}

/// 윈도우 크기 필드가 포함된 작업 span을 생성하는 매크로.
#[macro_export]
macro_rules! pattern_span {
    ($name:expr, $window:expr) => {
        tracing::info_span!($name, window = %$window)
    };
}
