//! 가격 계산을 위한 Decimal 타입.
//!
//! 가격은 DB의 `DECIMAL` 컬럼을 그대로 옮긴 `rust_decimal::Decimal`로 다룹니다.
//! 부동소수점 변환이 없으므로 종가 비교는 정확한 값 비교입니다.

use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Volume = Decimal;
