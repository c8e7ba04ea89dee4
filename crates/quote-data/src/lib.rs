//! 시세 데이터 소스와 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - 소스별 시세 로더 (JSON API, HTML 스크래핑)
//! - 소스 키 → 로더 생성 레지스트리
//! - 공유 HTTP 클라이언트 설정
//! - 종목별 JSON 파일 저장소 (원자적 교체)

pub mod client;
pub mod error;
pub mod provider;
pub mod storage;

pub use client::{build_http_client, HttpClientConfig, DEFAULT_USER_AGENT};
pub use error::{DataError, Result};
pub use provider::{parse_identity, LoaderFactory, LoaderRegistry};
pub use storage::JsonFileStore;
