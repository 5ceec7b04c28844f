//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use trend_core::PatternConfig;
use trend_data::DatabaseConfig;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 설정 (`DATABASE_URL`이 없으면 `None`)
    pub database: Option<DatabaseConfig>,
    /// 등락 형태 설정
    pub pattern: PatternConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 형태 재계산 주기 (분 단위)
    pub interval_minutes: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    ///
    /// `DATABASE_URL`은 여기서 요구하지 않습니다. 파동 데이터 명령은 DB 없이
    /// 실행되며, DB가 필요한 명령은 [`CollectorConfig::database`]에서 확인합니다.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_or = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let max = parse_or(
                    "DB_MAX_CONNECTIONS",
                    u64::from(DatabaseConfig::DEFAULT_MAX_CONNECTIONS),
                );
                let max = u32::try_from(max).unwrap_or(u32::MAX);
                DatabaseConfig::new(url).with_max_connections(max)
            });

        let defaults = PatternConfig::default();
        let pattern = PatternConfig {
            window_sizes: match lookup("PATTERN_WINDOW_SIZES") {
                Some(raw) => parse_window_sizes(&raw)?,
                None => defaults.window_sizes,
            },
            wavedata_dir: lookup("WAVEDATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.wavedata_dir),
            chart_max_tickers: lookup("CHART_MAX_TICKERS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.chart_max_tickers),
        };
        pattern.validate()?;

        Ok(Self {
            database,
            pattern,
            daemon: DaemonConfig {
                interval_minutes: parse_or("DAEMON_INTERVAL_MINUTES", 1440),
            },
        })
    }

    /// DB가 필요한 명령에서 데이터베이스 설정을 꺼냅니다.
    pub fn database(&self) -> Result<&DatabaseConfig> {
        self.database.as_ref().ok_or_else(|| {
            CollectorError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })
    }

    /// 설정 파일의 등락 형태 설정으로 교체합니다.
    pub fn with_pattern_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.pattern = PatternConfig::load(path)?;
        Ok(self)
    }
}

impl DaemonConfig {
    /// 재계산 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// 쉼표로 구분된 윈도우 크기 목록 파싱 (예: "3,5")
fn parse_window_sizes(raw: &str) -> Result<Vec<usize>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| {
                CollectorError::Config(format!("PATTERN_WINDOW_SIZES 파싱 실패: '{}'", s))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_window_sizes() {
        assert_eq!(parse_window_sizes("3,5").unwrap(), vec![3, 5]);
        assert_eq!(parse_window_sizes(" 3 , 5 , 10 ").unwrap(), vec![3, 5, 10]);
        assert!(parse_window_sizes("3,x").is_err());
        assert!(parse_window_sizes("").unwrap().is_empty());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_without_database_url() {
        let config =
            CollectorConfig::from_lookup(lookup(&[("WAVEDATA_DIR", "/data/wave")])).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.pattern.wavedata_dir, PathBuf::from("/data/wave"));
        assert_eq!(config.pattern.window_sizes, vec![3, 5]);
        assert_eq!(config.daemon.interval_minutes, 1440);

        let err = config.database().unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }

    #[test]
    fn test_config_with_database_url() {
        let config = CollectorConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/stock"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("PATTERN_WINDOW_SIZES", "3,5,7"),
            ("CHART_MAX_TICKERS", "20"),
        ]))
        .unwrap();

        let database = config.database().unwrap();
        assert_eq!(database.url, "postgresql://localhost/stock");
        assert_eq!(database.max_connections, 12);
        assert_eq!(config.pattern.window_sizes, vec![3, 5, 7]);
        assert_eq!(config.pattern.chart_max_tickers, 20);
    }

    #[test]
    fn test_config_rejects_bad_window_sizes() {
        for raw in ["3,x", "3,11", "0"] {
            let vars = lookup(&[("PATTERN_WINDOW_SIZES", raw)]);
            assert!(CollectorConfig::from_lookup(vars).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_daemon_interval() {
        let daemon = DaemonConfig {
            interval_minutes: 30,
        };
        assert_eq!(daemon.interval(), Duration::from_secs(1800));
    }
}
