//! 등락 형태 분석을 위한 도메인 모델.

mod market_data;
mod store;
mod trend;

pub use market_data::*;
pub use store::*;
pub use trend::*;
