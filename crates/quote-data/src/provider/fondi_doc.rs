//! FondiDoc 차트 데이터 로더.
//!
//! 식별자 형식: `ISIN.fundId`
//!
//! 응답 키가 펀드 ID라서 고정 구조체 대신 `serde_json::Value`로 탐색합니다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::finite_close;
use crate::client::fetch_json;

pub const SOURCE: &str = "fondidoc";

const BASE_URL: &str = "https://www.fondidoc.it";
const CHART_PATH: &str = "/Chart/ChartData";

/// 응답 타임스탬프 단위 (초)
const TIMESTAMP_UNIT_SECS: i64 = 100;

pub struct FondiDocLoader {
    name: String,
    isin: String,
    fund_id: String,
    client: Client,
    base_url: String,
}

impl FondiDocLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin, fund_id] = parse_identity(identity, ["ISIN", "fundId"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            fund_id,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn fund_id(&self) -> &str {
        &self.fund_id
    }

    /// `{fundId: {"data": [[t, close], ...]}}` 변환.
    fn to_quotes(&self, body: &Value) -> Vec<Quote> {
        let Some(rows) = body
            .get(&self.fund_id)
            .and_then(|fund| fund.get("data"))
            .and_then(Value::as_array)
        else {
            warn!(isin = %self.isin, fund_id = %self.fund_id, "펀드 데이터 없음");
            return Vec::new();
        };

        rows.iter()
            .filter_map(|row| {
                let pair = row.as_array().map(|r| {
                    (
                        r.first().and_then(Value::as_f64),
                        r.get(1).and_then(Value::as_f64),
                    )
                });

                let Some((Some(t), Some(close))) = pair else {
                    warn!(isin = %self.isin, %row, "잘못된 행 건너뜀");
                    return None;
                };

                let Some(close) = finite_close(close) else {
                    warn!(isin = %self.isin, close, "유효하지 않은 종가 건너뜀");
                    return None;
                };
                let Some(secs) = (t as i64).checked_mul(TIMESTAMP_UNIT_SECS) else {
                    warn!(isin = %self.isin, t, "타임스탬프 범위 초과 건너뜀");
                    return None;
                };
                match Utc.timestamp_opt(secs, 0).single() {
                    Some(date) => Some(Quote::new(date, close)),
                    None => {
                        warn!(isin = %self.isin, t, "잘못된 타임스탬프 건너뜀");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl QuoteLoader for FondiDocLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, CHART_PATH))
            .query(&[("ids", self.fund_id.as_str()), ("cur", "EUR")]);
        let body: Value = fetch_json(request).await?;

        Ok(self.to_quotes(&body))
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(FondiDocLoader::new(name, identity, client.clone())?))
}
