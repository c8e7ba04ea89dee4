//! Historical quote collector CLI.

use clap::{Parser, Subcommand};
use quote_collector::modules::{self, FleetOptions};
use quote_collector::{load_securities_from_path, CollectorConfig};
use quote_core::{init_logging, LogConfig, LogFormat};
use quote_data::{build_http_client, JsonFileStore, LoaderRegistry};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "quote-collector")]
#[command(about = "Historical quote collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error). 미지정 시 LOG_LEVEL/RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact). 미지정 시 LOG_FORMAT
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// 등록된 모든 종목의 시세 업데이트
    Update {
        /// 특정 종목만 업데이트 (쉼표로 구분, 예: "IT0005273013,LU0119620416")
        #[arg(long)]
        isin: Option<String>,
    },

    /// 종목 테이블에 등록된 종목 출력
    List,

    /// 사용 가능한 로더 소스 출력
    Sources,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // 로깅 초기화
    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(log_config)?;

    // 설정 로드
    let config = CollectorConfig::from_env();
    tracing::debug!(
        securities_csv = %config.securities_csv.display(),
        quotes_dir = %config.quotes_dir.display(),
        task_timeout = ?config.fleet.task_timeout(),
        "설정 로드 완료"
    );

    let client = build_http_client(&config.http)?;
    let loaders = LoaderRegistry::builtin(client);

    match cli.command {
        Commands::Sources => {
            for source in loaders.sources() {
                println!("{}", source);
            }
        }
        Commands::List => {
            let securities = load_securities_from_path(&config.securities_csv, &loaders)?;
            for loader in securities.iter() {
                println!("{}\t{}", loader.isin(), loader.name());
            }
        }
        Commands::Update { isin } => {
            tracing::info!("Quote Collector 시작");

            let mut securities = load_securities_from_path(&config.securities_csv, &loaders)?;

            if let Some(ref filter) = isin {
                let keep: Vec<String> = filter
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                for missing in keep.iter().filter(|k| !securities.contains(k)) {
                    tracing::warn!(isin = %missing, "종목 테이블에 없는 종목");
                }
                securities.retain_isins(&keep);
                tracing::info!(count = securities.len(), "특정 종목만 업데이트");
            }

            let store = Arc::new(JsonFileStore::new(&config.quotes_dir));
            let options = FleetOptions::from(&config.fleet);

            let stats = modules::run_fleet(&securities, store, &options).await;
            stats.log_summary("시세 업데이트");

            tracing::info!("Quote Collector 종료");
        }
    }

    Ok(())
}
