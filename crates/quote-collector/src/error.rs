//! 에러 타입 정의.

use quote_core::QuoteError;
use thiserror::Error;

/// Collector 에러 타입
///
/// 프로세스 수준(설정, 종목 테이블) 에러만 표현합니다. 종목별 업데이트
/// 실패는 `UpdateOutcome`으로 보고되며 이 타입으로 올라오지 않습니다.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 종목 CSV 파싱 에러 (테이블 전체 무효)
    #[error("Securities table error: {0}")]
    Csv(String),

    /// 파일 입출력 에러
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 데이터 소스/저장소 에러
    #[error("Data source error: {0}")]
    DataSource(#[from] QuoteError),
}

impl From<csv::Error> for CollectorError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
