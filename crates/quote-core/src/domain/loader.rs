//! 시세 로더 추상화.
//!
//! 데이터 소스마다 요청/응답 형식과 실패 양상이 다르지만,
//! 파이프라인은 이 trait만 보고 동작합니다.

use async_trait::async_trait;

use super::Quote;
use crate::error::QuoteResult;

/// 시세 로더 trait.
///
/// 구현체는 생성 이후 불변이며 호출 간 상태를 갖지 않습니다.
/// `load_quotes`는 반복적으로, 독립적으로 호출될 수 있습니다.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct BorsaItalianaLoader {
///     name: String,
///     isin: String,
///     market: String,
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl QuoteLoader for BorsaItalianaLoader {
///     fn name(&self) -> &str { &self.name }
///     fn isin(&self) -> &str { &self.isin }
///     async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
///         // 차트 API 호출 및 변환
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteLoader: Send + Sync {
    /// 표시용 종목명.
    fn name(&self) -> &str;

    /// 종목 식별자 (ISIN).
    ///
    /// 비어 있지 않으며, 중복 검사와 저장 키로 사용됩니다.
    fn isin(&self) -> &str;

    /// 데이터 소스에서 시세를 조회합니다.
    ///
    /// # Returns
    ///
    /// 순서가 보장되지 않는 시세 목록. 데이터가 없거나 응답 레이아웃을
    /// 인식하지 못한 경우 빈 벡터를 반환합니다.
    ///
    /// # Errors
    ///
    /// - `QuoteError::Fetch`: 네트워크 실패 또는 HTTP 에러 상태
    /// - `QuoteError::Parse`: 응답 본문 구조 파싱 실패
    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>>;
}
