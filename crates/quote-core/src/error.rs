//! 시세 수집 시스템의 에러 타입.
//!
//! 로더, 저장소, 레지스트리 경계를 넘는 모든 에러는 `QuoteError`로 표현됩니다.

use thiserror::Error;

/// 핵심 시세 에러.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// 데이터 소스 요청 실패 (네트워크, HTTP 상태)
    #[error("조회 에러: {0}")]
    Fetch(String),

    /// 응답 구조 파싱 실패
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 잘못된 종목 식별자
    #[error("잘못된 식별자 '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    /// 등록되지 않은 로더
    #[error("로더 [{0}]를 찾을 수 없습니다")]
    UnknownLoader(String),

    /// 이미 등록된 종목
    #[error("종목 '{0}'이(가) 이미 등록되어 있습니다")]
    DuplicateSecurity(String),

    /// 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 작업 시간 초과
    #[error("시간 초과: {0}")]
    Timeout(String),

    /// 내부 에러 (태스크 패닉 등)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 시세 작업을 위한 Result 타입.
pub type QuoteResult<T> = Result<T, QuoteError>;

impl QuoteError {
    /// 원격 데이터 소스에서 발생한 에러인지 확인합니다.
    pub fn is_source_error(&self) -> bool {
        matches!(self, QuoteError::Fetch(_) | QuoteError::Parse(_))
    }

    /// 영속 상태와 관련된 에러인지 확인합니다.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, QuoteError::Storage(_) | QuoteError::Serialization(_))
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Serialization(err.to_string())
    }
}
