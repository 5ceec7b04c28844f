//! 일자별 파동 데이터(JSON 파일) 조회.
//!
//! 파동 데이터는 외부 배치가 `<dir>/YYYY-MM-DD.json`으로 생성하며,
//! 형태 코드 → 종목 목록 형식입니다.
//!
//! ```json
//! {
//!   "332": [{"ticker": "AAPL", "close": 189.3}, {"ticker": "MSFT"}],
//!   "123": [{"ticker": "NVDA"}]
//! }
//! ```

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 파동 데이터의 종목 항목.
///
/// `ticker` 외의 필드는 원본 그대로 보존합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub ticker: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 하루치 파동 데이터.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveSnapshot {
    /// 데이터 기준일
    pub date: NaiveDate,
    /// 형태 코드 → 종목 목록
    pub patterns: BTreeMap<String, Vec<WaveEntry>>,
}

impl WaveSnapshot {
    /// 전체 종목 항목 수.
    pub fn total_stocks(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }

    /// 형태 코드의 종목 목록 (없으면 빈 슬라이스).
    pub fn entries(&self, code: &str) -> &[WaveEntry] {
        self.patterns.get(code).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 사용 가능한 파동 데이터 날짜.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailableDates {
    /// 오름차순 날짜 목록
    pub dates: Vec<NaiveDate>,
    /// 가장 최근 날짜
    pub latest: Option<NaiveDate>,
}

/// 파동 데이터 디렉토리 저장소.
#[derive(Debug, Clone)]
pub struct WaveDataRepository {
    dir: PathBuf,
}

impl WaveDataRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.json", date.format(DATE_FORMAT)))
    }

    /// 디렉토리의 `YYYY-MM-DD.json` 파일 날짜 목록을 조회합니다.
    ///
    /// 날짜로 해석되지 않는 파일명은 무시합니다.
    pub async fn available_dates(&self) -> Result<AvailableDates> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut dates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                Ok(date) => dates.push(date),
                Err(_) => debug!(file = %path.display(), "날짜 형식이 아닌 파일 무시"),
            }
        }

        dates.sort_unstable();
        dates.dedup();
        let latest = dates.last().copied();

        Ok(AvailableDates { dates, latest })
    }

    /// 파동 데이터를 로드합니다.
    ///
    /// `date`가 `None`이면 가장 최근 파일을 사용합니다. 파일이 없으면 `Ok(None)`.
    pub async fn load(&self, date: Option<NaiveDate>) -> Result<Option<WaveSnapshot>> {
        let date = match date {
            Some(d) => d,
            None => match self.available_dates().await?.latest {
                Some(latest) => latest,
                None => {
                    warn!(dir = %self.dir.display(), "파동 데이터 파일이 없습니다");
                    return Ok(None);
                }
            },
        };

        let path = self.path_for(date);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(file = %path.display(), "파동 데이터 파일 없음");
                return Ok(None);
            }
            Err(e) => return Err(DataError::from(e)),
        };

        let patterns: BTreeMap<String, Vec<WaveEntry>> = serde_json::from_slice(&raw)?;
        debug!(
            date = %date,
            patterns = patterns.len(),
            "파동 데이터 로드"
        );

        Ok(Some(WaveSnapshot { date, patterns }))
    }
}
