//! Borsa Italiana 차트 서비스 로더.
//!
//! 식별자 형식: `ISIN.market` (예: `IT0005273013.MOT`)
//!
//! 10년치 일봉 OHLC를 한 번에 요청하고 종가만 사용합니다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::finite_close;
use crate::client::fetch_json;

pub const SOURCE: &str = "borsaitaliana";

const BASE_URL: &str = "https://charts.borsaitaliana.it";
const PRICES_PATH: &str = "/charts/services/ChartWService.asmx/GetPricesWithVolume";

/// Borsa Italiana 로더.
pub struct BorsaItalianaLoader {
    name: String,
    isin: String,
    market: String,
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct RequestEnvelope<'a> {
    request: RequestPayload<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RequestPayload<'a> {
    sample_time: &'a str,
    time_frame: &'a str,
    requested_data_set_type: &'a str,
    chart_price_type: &'a str,
    key: String,
    off_set: i32,
    use_delay: bool,
    key_type: &'a str,
    key_type2: &'a str,
    language: &'a str,
}

/// 응답: `[[epoch_ms, close, open, high, low, ...], ...]`
#[derive(Debug, Deserialize)]
struct ResponsePayload {
    #[serde(rename = "d", default)]
    data: Vec<Vec<Option<f64>>>,
}

impl BorsaItalianaLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin, market] = parse_identity(identity, ["ISIN", "market"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            market,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// 요청 대상 서버 변경 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    fn to_quotes(&self, payload: ResponsePayload) -> Vec<Quote> {
        payload
            .data
            .into_iter()
            .filter_map(|row| {
                let (Some(Some(millis)), Some(Some(close))) =
                    (row.first().copied(), row.get(1).copied())
                else {
                    warn!(isin = %self.isin, ?row, "불완전한 행 건너뜀");
                    return None;
                };

                let Some(close) = finite_close(close) else {
                    warn!(isin = %self.isin, close, "유효하지 않은 종가 건너뜀");
                    return None;
                };
                match Utc.timestamp_opt((millis / 1000.0) as i64, 0).single() {
                    Some(date) => Some(Quote::new(date, close)),
                    None => {
                        warn!(isin = %self.isin, millis, "잘못된 타임스탬프 건너뜀");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl QuoteLoader for BorsaItalianaLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let envelope = RequestEnvelope {
            request: RequestPayload {
                sample_time: "1d",
                time_frame: "10y",
                requested_data_set_type: "ohlc",
                chart_price_type: "price",
                key: format!("{}.{}", self.isin, self.market),
                off_set: 0,
                use_delay: false,
                key_type: "Topic",
                key_type2: "Topic",
                language: "en-US",
            },
        };

        let request = self
            .client
            .post(format!("{}{}", self.base_url, PRICES_PATH))
            .json(&envelope);
        let payload: ResponsePayload = fetch_json(request).await?;

        Ok(self.to_quotes(payload))
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(BorsaItalianaLoader::new(name, identity, client.clone())?))
}
