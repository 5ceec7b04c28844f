//! 설정 관리.
//!
//! 지원 윈도우 크기, 파동 데이터 디렉토리 등은 전역 상수가 아니라
//! 생성 시점에 컴포넌트로 전달되는 명시적 설정입니다.

use crate::error::{TrendError, TrendResult};
use crate::types::WindowSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 등락 형태 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternConfig {
    /// 지원하는 윈도우 크기 (일)
    #[serde(default = "default_window_sizes")]
    pub window_sizes: Vec<usize>,
    /// 파동 데이터 JSON 파일 디렉토리 (`<dir>/YYYY-MM-DD.json`)
    #[serde(default = "default_wavedata_dir")]
    pub wavedata_dir: PathBuf,
    /// 형태 차트에 표시할 최대 종목 수
    #[serde(default = "default_chart_max_tickers")]
    pub chart_max_tickers: usize,
}

fn default_window_sizes() -> Vec<usize> {
    vec![3, 5]
}
fn default_wavedata_dir() -> PathBuf {
    PathBuf::from("./wavedata")
}
fn default_chart_max_tickers() -> usize {
    50
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            window_sizes: default_window_sizes(),
            wavedata_dir: default_wavedata_dir(),
            chart_max_tickers: default_chart_max_tickers(),
        }
    }
}

impl PatternConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `TREND__` 접두사를 사용합니다 (예: `TREND__WINDOW_SIZES=3,5`).
    pub fn load<P: AsRef<Path>>(path: P) -> TrendResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("window_sizes", vec![3_i64, 5])?
            .set_default("wavedata_dir", "./wavedata")?
            .set_default("chart_max_tickers", 50_i64)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("TREND")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("window_sizes")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정값을 검증합니다.
    pub fn validate(&self) -> TrendResult<()> {
        if self.window_sizes.is_empty() {
            return Err(TrendError::Config(
                "window_sizes는 비어 있을 수 없습니다".to_string(),
            ));
        }
        if let Some(bad) = self
            .window_sizes
            .iter()
            .find(|d| WindowSize::new(**d).is_err())
        {
            return Err(TrendError::Config(format!(
                "window_sizes는 1~{} 범위여야 합니다: {}",
                WindowSize::MAX_DAYS,
                bad
            )));
        }
        if self.chart_max_tickers == 0 {
            return Err(TrendError::Config(
                "chart_max_tickers는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 요청된 윈도우 크기가 지원 목록에 있는지 확인합니다.
    pub fn window(&self, days: usize) -> TrendResult<WindowSize> {
        if !self.window_sizes.contains(&days) {
            return Err(TrendError::InvalidParameter(format!(
                "지원하지 않는 윈도우 크기: {}일 (지원: {:?})",
                days, self.window_sizes
            )));
        }
        WindowSize::new(days)
    }

    /// 지원하는 모든 윈도우 크기 (오름차순, 중복 제거).
    pub fn supported_windows(&self) -> TrendResult<Vec<WindowSize>> {
        let mut sizes = self.window_sizes.clone();
        sizes.sort_unstable();
        sizes.dedup();
        sizes.into_iter().map(WindowSize::new).collect()
    }
}
