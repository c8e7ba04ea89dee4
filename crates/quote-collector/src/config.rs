//! 환경변수 기반 설정 모듈.

use quote_data::{HttpClientConfig, DEFAULT_USER_AGENT};
use std::path::PathBuf;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 종목 CSV 경로
    pub securities_csv: PathBuf,
    /// 시세 JSON 저장 디렉터리
    pub quotes_dir: PathBuf,
    /// HTTP 클라이언트 설정
    pub http: HttpClientConfig,
    /// 플릿 실행 설정
    pub fleet: FleetConfig,
}

/// 플릿 실행 설정
#[derive(Debug, Clone, Default)]
pub struct FleetConfig {
    /// 종목별 작업 제한 시간 (초, 미설정 시 무제한)
    pub task_timeout_secs: Option<u64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            securities_csv: PathBuf::from("securities.csv"),
            quotes_dir: PathBuf::from("out/json"),
            http: HttpClientConfig::default(),
            fleet: FleetConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            securities_csv: env_var_path("SECURITIES_CSV", defaults.securities_csv),
            quotes_dir: env_var_path("QUOTES_DIR", defaults.quotes_dir),
            http: HttpClientConfig {
                timeout: Duration::from_secs(env_var_parse("HTTP_TIMEOUT_SECS", 30)),
                user_agent: std::env::var("HTTP_USER_AGENT")
                    .ok()
                    .filter(|ua| !ua.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            fleet: FleetConfig {
                task_timeout_secs: std::env::var("TASK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .filter(|secs| *secs > 0),
            },
        }
    }
}

impl FleetConfig {
    /// 작업 제한 시간을 Duration으로 반환
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 경로 읽기 (비어 있으면 기본값)
fn env_var_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}
