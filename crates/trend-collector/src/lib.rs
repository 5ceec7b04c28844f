//! Stock trend pattern batch generator.
//!
//! 이 crate는 등락 형태 계산 배치와 조회 명령을 제공하는 바이너리를 제공합니다:
//! - 등락 형태 생성 (3일/5일 슬라이딩 윈도우, 트랜잭션 업서트)
//! - 형태 코드별 조회 및 통계
//! - 일자별 파동 데이터 요약/차트 데이터
//! - 종목 목록, 종가 시계열, 일/주/월 K선

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::GenerationStats;
