//! 형태 생성 및 조회 모듈.

pub mod pattern_generate;
pub mod pattern_query;
pub mod price_query;
pub mod wave_report;

pub use pattern_generate::{generate_all_patterns, generate_patterns, TrendPatternGenerator};
pub use pattern_query::{
    pattern_type_counts, patterns_by_type, query_pattern_types, query_patterns, PatternTypeCounts,
    PatternsByType,
};
pub use price_query::{
    close_series, kline, list_tickers, CloseSeries, DateRange, KlineSeries, DEFAULT_CLOSE_DAYS,
    DEFAULT_KLINE_DAYS,
};
pub use wave_report::{
    load_snapshot, pattern_chart_data, pattern_summary, pattern_tickers, wave_dates, ChartSeries,
    PatternSummary, WaveChart, WaveSummary, WaveTickers,
};
