//! Financial Times 차트 API 로더.
//!
//! 식별자 형식: `ISIN.symbol` (예: `LU0119620416.LU0119620416:EUR`)

use async_trait::async_trait;
use chrono::NaiveDateTime;
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::finite_close;
use crate::client::fetch_json;

pub const SOURCE: &str = "financialtimes";

const BASE_URL: &str = "https://markets.ft.com";
const SERIES_PATH: &str = "/data/chartapi/series";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 요청 기간 (30년)
const HISTORY_DAYS: u32 = 365 * 30;

pub struct FinancialTimesLoader {
    name: String,
    isin: String,
    symbol: String,
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPayload<'a> {
    days: u32,
    data_period: &'a str,
    data_interval: u32,
    y_format: &'a str,
    return_date_type: &'a str,
    elements: Vec<RequestElement<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RequestElement<'a> {
    #[serde(rename = "Type")]
    kind: &'a str,
    symbol: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponsePayload {
    #[serde(default)]
    dates: Vec<String>,
    #[serde(default)]
    elements: Vec<ResponseElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseElement {
    #[serde(default)]
    component_series: Vec<ComponentSeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ComponentSeries {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(default)]
    values: Vec<Option<f64>>,
}

impl FinancialTimesLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin, symbol] = parse_identity(identity, ["ISIN", "symbol"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            symbol,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// `Dates`와 `Close` 시리즈를 짝지어 변환.
    fn to_quotes(&self, payload: ResponsePayload) -> Vec<Quote> {
        let Some(close) = payload
            .elements
            .into_iter()
            .next()
            .and_then(|e| e.component_series.into_iter().find(|c| c.kind == "Close"))
        else {
            warn!(isin = %self.isin, symbol = %self.symbol, "Close 시리즈 없음");
            return Vec::new();
        };

        if payload.dates.len() != close.values.len() {
            warn!(
                isin = %self.isin,
                dates = payload.dates.len(),
                values = close.values.len(),
                "날짜와 값의 길이가 다름"
            );
            return Vec::new();
        }

        payload
            .dates
            .iter()
            .zip(close.values)
            .filter_map(|(raw_date, value)| {
                let date = match NaiveDateTime::parse_from_str(raw_date, DATE_FORMAT) {
                    Ok(date) => date.and_utc(),
                    Err(e) => {
                        warn!(isin = %self.isin, date = %raw_date, error = %e, "날짜 파싱 실패");
                        return None;
                    }
                };
                let Some(close) = value else {
                    warn!(isin = %self.isin, date = %raw_date, "종가 없음");
                    return None;
                };
                let Some(close) = finite_close(close) else {
                    warn!(isin = %self.isin, date = %raw_date, close, "유효하지 않은 종가 건너뜀");
                    return None;
                };
                Some(Quote::new(date, close))
            })
            .collect()
    }
}

#[async_trait]
impl QuoteLoader for FinancialTimesLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let payload = RequestPayload {
            days: HISTORY_DAYS,
            data_period: "Day",
            data_interval: 1,
            y_format: "0.###",
            return_date_type: "ISO8601",
            elements: vec![RequestElement {
                kind: "price",
                symbol: &self.symbol,
            }],
        };

        let request = self
            .client
            .post(format!("{}{}", self.base_url, SERIES_PATH))
            .json(&payload);
        let response: ResponsePayload = fetch_json(request).await?;

        Ok(self.to_quotes(response))
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(FinancialTimesLoader::new(name, identity, client.clone())?))
}
