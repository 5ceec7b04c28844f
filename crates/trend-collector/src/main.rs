//! Trend pattern batch generator and query CLI.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use trend_collector::{modules, CollectorConfig};
use trend_core::{init_logging, KlinePeriod, LogFormat};
use trend_data::{Database, PgPriceHistoryStore, WaveDataRepository};

#[derive(Parser)]
#[command(name = "trend-collector")]
#[command(about = "Stock Trend Pattern Generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// 등락 형태 설정 파일 (지정 시 환경변수 설정 대신 사용)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 등락 형태 생성 (지정 윈도우)
    GeneratePatterns {
        /// 윈도우 크기 (일)
        #[arg(long)]
        days: usize,
    },

    /// 지원하는 모든 윈도우 크기로 형태 생성
    RunAll,

    /// 데몬 모드: 주기적으로 전체 형태 생성
    Daemon,

    /// 형태 코드별 레코드 조회
    Patterns {
        #[arg(long)]
        days: usize,
        /// 형태 코드 (예: "332")
        #[arg(long)]
        code: String,
    },

    /// 형태 코드별 개수 통계
    PatternTypes {
        #[arg(long)]
        days: usize,
    },

    /// 사용 가능한 파동 데이터 날짜
    WaveDates,

    /// 파동 데이터 형태별 요약
    WaveSummary {
        /// 기준일 (YYYY-MM-DD, 생략 시 최신)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// 파동 데이터 형태 코드의 종목 목록
    WaveTickers {
        #[arg(long)]
        code: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// 파동 데이터 형태 코드의 차트 데이터
    WaveChart {
        #[arg(long)]
        code: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// 종목 목록
    Tickers,

    /// 종가 시계열 (기본: 최근 30일)
    Closes {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// 일/주/월 K선 (기본: 최근 365일)
    Kline {
        #[arg(long)]
        ticker: String,
        /// daily, weekly, monthly
        #[arg(long, default_value = "daily")]
        period: KlinePeriod,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// 데이터베이스 마이그레이션 실행
    Migrate,
}

impl Commands {
    /// 데이터베이스 연결이 필요한 명령인지 확인
    fn needs_database(&self) -> bool {
        !matches!(
            self,
            Commands::WaveDates | Commands::WaveSummary { .. } | Commands::WaveTickers { .. }
        )
    }
}

/// 조회 결과를 stdout에 JSON으로 출력
fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(&cli.log_level, cli.log_format)?;

    tracing::info!("Trend Pattern Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    if let Some(path) = &cli.config {
        config = config.with_pattern_file(path)?;
    }
    tracing::debug!(
        database = config.database.is_some(),
        windows = ?config.pattern.window_sizes,
        wavedata_dir = %config.pattern.wavedata_dir.display(),
        "설정 로드 완료"
    );

    // DB 연결
    let db = if cli.command.needs_database() {
        Some(Database::connect(config.database()?).await?)
    } else {
        None
    };
    let db_ref = || db.as_ref().ok_or("데이터베이스 연결이 없습니다");

    let waves = WaveDataRepository::new(&config.pattern.wavedata_dir);
    let today = Utc::now().date_naive();

    // 명령 실행
    match cli.command {
        Commands::GeneratePatterns { days } => {
            let stats = modules::generate_patterns(db_ref()?, &config, days).await?;
            stats.log_summary("등락 형태 생성");
            print_json(&stats.summary())?;
        }
        Commands::RunAll => {
            tracing::info!("=== 전체 윈도우 형태 생성 시작 ===");
            let all = modules::generate_all_patterns(db_ref()?, &config).await?;
            for stats in &all {
                stats.log_summary("등락 형태 생성");
            }
            print_json(&all)?;
            tracing::info!("=== 전체 윈도우 형태 생성 완료 ===");
        }
        Commands::Daemon => {
            let db = db_ref()?;
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 형태 생성 실행 시작 ===");

                        match modules::generate_all_patterns(db, &config).await {
                            Ok(all) => {
                                for stats in &all {
                                    stats.log_summary("등락 형태 생성");
                                }
                            }
                            Err(e) => {
                                tracing::error!("등락 형태 생성 실패: {}", e);
                            }
                        }

                        tracing::info!(
                            "=== 형태 생성 완료, 다음 실행: {}분 후 ===",
                            config.daemon.interval_minutes
                        );
                    }
                }
            }
        }
        Commands::Patterns { days, code } => {
            let result = modules::query_patterns(db_ref()?, &config.pattern, days, &code).await?;
            print_json(&result)?;
        }
        Commands::PatternTypes { days } => {
            let result = modules::query_pattern_types(db_ref()?, &config.pattern, days).await?;
            print_json(&result)?;
        }
        Commands::WaveDates => {
            print_json(&modules::wave_dates(&waves).await?)?;
        }
        Commands::WaveSummary { date } => {
            let snapshot = modules::load_snapshot(&waves, date).await?;
            print_json(&modules::pattern_summary(&snapshot))?;
        }
        Commands::WaveTickers { code, date } => {
            let snapshot = modules::load_snapshot(&waves, date).await?;
            print_json(&modules::pattern_tickers(&snapshot, &code))?;
        }
        Commands::WaveChart { code, date } => {
            let snapshot = modules::load_snapshot(&waves, date).await?;
            let store = PgPriceHistoryStore::new(db_ref()?.clone());
            let chart = modules::pattern_chart_data(
                &snapshot,
                &code,
                &store,
                config.pattern.chart_max_tickers,
            )
            .await?;
            print_json(&chart)?;
        }
        Commands::Tickers => {
            let store = PgPriceHistoryStore::new(db_ref()?.clone());
            print_json(&modules::list_tickers(&store).await?)?;
        }
        Commands::Closes { ticker, from, to } => {
            let store = PgPriceHistoryStore::new(db_ref()?.clone());
            let range = modules::DateRange::resolve(from, to, modules::DEFAULT_CLOSE_DAYS, today)?;
            print_json(&modules::close_series(&store, &ticker, range).await?)?;
        }
        Commands::Kline {
            ticker,
            period,
            from,
            to,
        } => {
            let store = PgPriceHistoryStore::new(db_ref()?.clone());
            let range = modules::DateRange::resolve(from, to, modules::DEFAULT_KLINE_DAYS, today)?;
            print_json(&modules::kline(&store, &ticker, period, range).await?)?;
        }
        Commands::Migrate => {
            db_ref()?.migrate().await?;
            tracing::info!("마이그레이션 완료");
        }
    }

    if let Some(db) = &db {
        db.close().await;
    }
    tracing::info!("Trend Pattern Collector 종료");

    Ok(())
}
