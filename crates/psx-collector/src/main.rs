//! PSX daily OHLCV collector CLI.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use psx_collector::modules::{run_daily, RunOptions};
use psx_collector::CollectorConfig;
use psx_core::logging::{init_logging, LogConfig, LogFormat};
use psx_core::TargetPeriod;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "psx-collector")]
#[command(about = "PSX Daily OHLCV Collector", long_about = None)]
#[command(version)]
struct Cli {
    /// 수집 대상 일자 (YYYY-MM-DD, 기본: 어제 PKT)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// 특정 종목만 수집 (쉼표로 구분, 예: "OGDC,HBL")
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// 앞에서부터 N개 종목만 수집
    #[arg(long)]
    limit: Option<usize>,

    /// 출력 CSV 경로 (PSX_OUTPUT_CSV 대체)
    #[arg(long)]
    output: Option<PathBuf>,

    /// 회사 디렉토리 CSV 경로 (PSX_COMPANY_LIST 대체)
    #[arg(long)]
    company_list: Option<PathBuf>,

    /// 조회만 하고 파일에 쓰지 않음
    #[arg(long)]
    dry_run: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 로깅 초기화
    let filter = format!(
        "psx_collector={lvl},psx_data={lvl},psx_core={lvl}",
        lvl = cli.log_level
    );
    let mut log_config = LogConfig::new(filter).with_env_format();
    if let Some(format) = cli.log_format {
        log_config = log_config.with_format(format);
    }
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::info!("PSX Daily Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env().context("설정 로드 실패")?;
    if let Some(output) = cli.output {
        config.output.csv_path = output;
    }
    if let Some(company_list) = cli.company_list {
        config.directory.company_list = company_list;
    }
    tracing::debug!(
        base_url = %config.source.base_url,
        company_list = %config.directory.company_list.display(),
        output = %config.output.csv_path.display(),
        "설정 로드 완료"
    );

    let period = match cli.date {
        Some(date) => TargetPeriod::for_date(date),
        None => TargetPeriod::yesterday_in(config.daily_collect.timezone, Utc::now()),
    };
    tracing::info!(period = %period, "수집 대상 일자");

    let options = RunOptions {
        period,
        symbols: cli.symbols,
        limit: cli.limit,
        dry_run: cli.dry_run,
    };

    let stats = run_daily(&config, &options)
        .await
        .context("일별 수집 실패")?;
    stats.log_summary("일별 시세 수집");

    tracing::info!("PSX Daily Collector 종료");

    Ok(())
}
