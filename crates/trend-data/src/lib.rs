//! 가격 이력 및 등락 형태 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - PostgreSQL 연결 풀 및 마이그레이션
//! - `stock_history` 기반 가격 이력 저장소
//! - `stock_trend_pattern` 기반 등락 형태 저장소 (트랜잭션 업서트)
//! - 테스트/오프라인용 메모리 저장소
//! - 일자별 파동 데이터(JSON 파일) 조회

pub mod error;
pub mod storage;
pub mod wavedata;

pub use error::{DataError, Result};

// 저장소 타입 재내보내기
pub use storage::database::{Database, DatabaseConfig};
pub use storage::memory::{MemoryPatternStore, MemoryPriceHistoryStore};
pub use storage::pattern::{PgPatternStore, TrendPatternRecord};
pub use storage::price_history::{PgPriceHistoryStore, StockHistoryRecord};

// 파동 데이터 재내보내기
pub use wavedata::{AvailableDates, WaveDataRepository, WaveEntry, WaveSnapshot};
