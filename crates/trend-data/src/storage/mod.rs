//! 저장소 구현.

pub mod database;
pub mod memory;
pub mod pattern;
pub mod price_history;
