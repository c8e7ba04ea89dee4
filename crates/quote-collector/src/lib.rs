//! Historical quote collector.
//!
//! 이 crate는 종목 테이블에 등록된 모든 종목의 과거 시세를 갱신하는 바이너리를 제공합니다:
//! - 종목 CSV 로딩 (소스별 로더 바인딩)
//! - 종목별 조회 → 병합 → 원자적 저장
//! - 종목 단위로 격리된 동시 실행 및 통계 요약

pub mod config;
pub mod error;
pub mod modules;
pub mod securities;
pub mod stats;

pub use config::{CollectorConfig, FleetConfig};
pub use error::{CollectorError, Result};
pub use securities::{load_securities, load_securities_from_path};
pub use stats::CollectionStats;
