//! 시세 데이터 소스 (로더) 모듈.
//!
//! ## JSON API
//! - `borsaitaliana`: Borsa Italiana 차트 서비스 (`ISIN.market`)
//! - `financialtimes`: FT 차트 API (`ISIN.symbol`)
//! - `fondidoc`: FondiDoc 차트 데이터 (`ISIN.fundId`)
//! - `morganstanley`: Morgan Stanley NAV 이력 (`ISIN.fundId.shareClassId`)
//! - `corepension`: CorePension NAV 이력 (`ISIN`)
//!
//! ## HTML 스크래핑
//! - `fonte`: Fondo FonTe 월별 수익 (`ISIN.urlName`)
//! - `cometa`: Fondo Cometa 수익 테이블 (`ISIN.urlName`)
//! - `secondapensione`: Seconda Pensione 상품 페이지 (`ISIN`)
//!
//! `LoaderRegistry`가 CSV의 소스 키를 로더 생성 함수로 연결합니다.

pub mod borsa_italiana;
pub mod cometa;
pub mod core_pension;
pub mod financial_times;
pub mod fondi_doc;
pub mod fonte;
pub mod identity;
pub mod morgan_stanley;
pub mod seconda_pensione;

mod parse;

pub use borsa_italiana::BorsaItalianaLoader;
pub use cometa::CometaLoader;
pub use core_pension::CorePensionLoader;
pub use financial_times::FinancialTimesLoader;
pub use fondi_doc::FondiDocLoader;
pub use fonte::FonTeLoader;
pub use identity::parse_identity;
pub use morgan_stanley::MorganStanleyLoader;
pub use seconda_pensione::SecondaPensioneLoader;

use quote_core::{QuoteError, QuoteLoader, QuoteResult};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 로더 생성 함수: `(종목명, 식별자, HTTP 클라이언트)` → 로더.
pub type LoaderFactory = fn(&str, &str, &Client) -> QuoteResult<Arc<dyn QuoteLoader>>;

/// 소스 키 → 로더 생성 함수 레지스트리.
///
/// 모든 로더가 같은 HTTP 클라이언트(커넥션 풀)를 공유합니다.
#[derive(Clone)]
pub struct LoaderRegistry {
    client: Client,
    factories: BTreeMap<&'static str, LoaderFactory>,
}

impl LoaderRegistry {
    /// 빈 레지스트리 생성.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            factories: BTreeMap::new(),
        }
    }

    /// 내장 소스를 모두 등록한 레지스트리.
    pub fn builtin(client: Client) -> Self {
        let mut registry = Self::new(client);
        registry.register(borsa_italiana::SOURCE, borsa_italiana::factory);
        registry.register(financial_times::SOURCE, financial_times::factory);
        registry.register(fondi_doc::SOURCE, fondi_doc::factory);
        registry.register(morgan_stanley::SOURCE, morgan_stanley::factory);
        registry.register(core_pension::SOURCE, core_pension::factory);
        registry.register(fonte::SOURCE, fonte::factory);
        registry.register(cometa::SOURCE, cometa::factory);
        registry.register(seconda_pensione::SOURCE, seconda_pensione::factory);
        registry
    }

    /// 소스 등록 (같은 키는 교체).
    pub fn register(&mut self, source: &'static str, factory: LoaderFactory) {
        self.factories.insert(source, factory);
    }

    pub fn contains(&self, source: &str) -> bool {
        self.factories.contains_key(source)
    }

    /// 등록된 소스 키 (정렬됨).
    pub fn sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// 소스 키로 로더 생성.
    ///
    /// # Errors
    ///
    /// - `QuoteError::UnknownLoader`: 등록되지 않은 소스
    /// - `QuoteError::InvalidIdentity`: 소스가 요구하는 식별자 형식이 아님
    pub fn create(
        &self,
        source: &str,
        name: &str,
        identity: &str,
    ) -> QuoteResult<Arc<dyn QuoteLoader>> {
        let factory = self
            .factories
            .get(source)
            .ok_or_else(|| QuoteError::UnknownLoader(source.to_string()))?;
        factory(name, identity, &self.client)
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("sources", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
