//! Fondo Cometa 수익 테이블 로더.
//!
//! 식별자 형식: `ISIN.urlName`
//!
//! `#table_2`의 각 행은 `MM/YYYY`와 쉼표 소수점 값이며, 날짜는 그 달의 말일입니다.

use async_trait::async_trait;
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::{element_text, last_day_of_month, parse_price, selector};
use crate::client::fetch_text;

pub const SOURCE: &str = "cometa";

const BASE_URL: &str = "https://www.cometafondo.it";

pub struct CometaLoader {
    name: String,
    isin: String,
    url_name: String,
    client: Client,
    base_url: String,
}

impl CometaLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin, url_name] = parse_identity(identity, ["ISIN", "urlName"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            url_name,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url_name(&self) -> &str {
        &self.url_name
    }

    fn parse_page(&self, body: &str) -> QuoteResult<Vec<Quote>> {
        let row_sel = selector("#table_2 tbody tr")?;
        let cell_sel = selector("td")?;

        let document = Html::parse_document(body);
        let mut quotes = Vec::new();

        for row in document.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            let [raw_period, raw_value, ..] = cells.as_slice() else {
                warn!(isin = %self.isin, "불완전한 행 건너뜀");
                continue;
            };

            let Some(day) = parse_month_period(raw_period) else {
                warn!(isin = %self.isin, period = %raw_period, "날짜 파싱 실패");
                continue;
            };

            match parse_price(raw_value) {
                Some(close) => quotes.push(Quote::on_day(day, close)),
                None => warn!(isin = %self.isin, %day, value = %raw_value, "가격 파싱 실패"),
            }
        }

        Ok(quotes)
    }
}

/// `MM/YYYY` → 해당 월 말일.
fn parse_month_period(raw: &str) -> Option<chrono::NaiveDate> {
    let (month, year) = raw.trim().split_once('/')?;
    last_day_of_month(year.trim().parse().ok()?, month.trim().parse().ok()?)
}

#[async_trait]
impl QuoteLoader for CometaLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let url = format!("{}/andamenti/{}", self.base_url, self.url_name);
        let body = fetch_text(self.client.get(url)).await?;
        self.parse_page(&body)
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(CometaLoader::new(name, identity, client.clone())?))
}
