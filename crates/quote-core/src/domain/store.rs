//! 시세 시계열 영속화 추상화.

use async_trait::async_trait;

use super::Quote;
use crate::error::QuoteResult;

/// 종목별 시세 시계열 저장소.
///
/// 키는 종목 식별자이며, 종목 하나당 하나의 blob을 가집니다.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// 저장된 시계열을 읽습니다.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(quotes))`: 저장된 시계열
    /// - `Ok(None)`: 아직 저장된 적 없음 (첫 실행)
    /// - `Err(...)`: 권한 문제, 손상된 데이터 등
    async fn read(&self, isin: &str) -> QuoteResult<Option<Vec<Quote>>>;

    /// 시계열 전체를 교체합니다.
    ///
    /// 쓰기는 원자적이어야 합니다: 기존 내용을 완전히 대체하거나
    /// 건드리지 않은 채로 남겨야 합니다.
    async fn write(&self, isin: &str, quotes: &[Quote]) -> QuoteResult<()>;
}
