//! 데이터 모듈 오류 타입.

use quote_core::QuoteError;
use thiserror::Error;

/// 데이터 소스/저장소 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 오류 (연결, 타임아웃, 본문 수신)
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 에러 상태 코드 응답
    #[error("HTTP status {status} from {url}")]
    StatusError { status: u16, url: String },

    /// 응답 구조 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 파일 입출력 오류
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for QuoteError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::HttpError(_) | DataError::StatusError { .. } => {
                QuoteError::Fetch(err.to_string())
            }
            DataError::ParseError(msg) | DataError::SerializationError(msg) => {
                QuoteError::Parse(msg)
            }
            DataError::IoError { .. } => QuoteError::Storage(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
