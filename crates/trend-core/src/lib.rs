//! # Trend Core
//!
//! 주가 등락 형태(trend pattern) 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 가격 데이터 (`PricePoint`) 및 주봉/월봉 집계
//! - 등락 형태 분류 (`TrendDirection`, `TrendPattern`)
//! - 가격/형태 저장소 trait
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
