//! 종목 레지스트리.
//!
//! 식별자당 로더 하나만 허용합니다. 업데이트 플릿은 이 레지스트리를 통해서만
//! 로더를 받으므로, 종목과 태스크(그리고 저장 파일)는 1:1로 대응합니다.

use std::collections::HashSet;
use std::sync::Arc;

use super::QuoteLoader;
use crate::error::{QuoteError, QuoteResult};

/// 등록된 종목 로더 목록 (등록 순서 유지).
#[derive(Default, Clone)]
pub struct SecurityRegistry {
    loaders: Vec<Arc<dyn QuoteLoader>>,
    isins: HashSet<String>,
}

impl SecurityRegistry {
    /// 빈 레지스트리 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 로더를 등록합니다.
    ///
    /// # Errors
    ///
    /// - `QuoteError::InvalidIdentity`: 식별자가 비어 있음
    /// - `QuoteError::DuplicateSecurity`: 이미 등록된 식별자
    ///
    /// 실패 시 레지스트리는 변경되지 않습니다.
    pub fn register(&mut self, loader: Arc<dyn QuoteLoader>) -> QuoteResult<()> {
        let isin = loader.isin();
        if isin.trim().is_empty() {
            return Err(QuoteError::InvalidIdentity {
                identity: isin.to_string(),
                reason: "ISIN은 비어 있을 수 없습니다".to_string(),
            });
        }

        if !self.isins.insert(isin.to_string()) {
            return Err(QuoteError::DuplicateSecurity(isin.to_string()));
        }

        self.loaders.push(loader);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn contains(&self, isin: &str) -> bool {
        self.isins.contains(isin)
    }

    /// 식별자로 로더 조회.
    pub fn get(&self, isin: &str) -> Option<&Arc<dyn QuoteLoader>> {
        self.loaders.iter().find(|l| l.isin() == isin)
    }

    /// 등록 순서대로 순회.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn QuoteLoader>> {
        self.loaders.iter()
    }

    /// 주어진 식별자만 남깁니다 (CLI 필터용).
    pub fn retain_isins(&mut self, keep: &[String]) {
        self.loaders.retain(|l| keep.iter().any(|k| k == l.isin()));
        self.isins.retain(|isin| keep.contains(isin));
    }

    pub fn into_loaders(self) -> Vec<Arc<dyn QuoteLoader>> {
        self.loaders
    }
}

impl std::fmt::Debug for SecurityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.loaders.iter().map(|l| l.isin()))
            .finish()
    }
}
