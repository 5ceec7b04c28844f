//! 워크스페이스 전반에서 사용되는 공통 타입.

mod decimal;
mod window;

pub use decimal::*;
pub use window::*;
