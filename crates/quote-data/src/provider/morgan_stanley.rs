//! Morgan Stanley 펀드 NAV 이력 로더.
//!
//! 식별자 형식: `ISIN.fundId.shareClassId`

use async_trait::async_trait;
use chrono::NaiveDate;
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::parse_decimal;
use crate::client::fetch_json;

pub const SOURCE: &str = "morganstanley";

const BASE_URL: &str = "https://www.morganstanley.com";
const DATE_FORMAT: &str = "%m/%d/%Y";
const CURRENCY: &str = "EUR";

pub struct MorganStanleyLoader {
    name: String,
    isin: String,
    fund_id: String,
    share_class_id: String,
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HistoricalNav {
    en: NavContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavContent {
    #[serde(default)]
    share_classes: Vec<ShareClass>,
}

#[derive(Debug, Deserialize)]
struct ShareClass {
    id: String,
    #[serde(default)]
    currencies: Vec<Currency>,
}

#[derive(Debug, Deserialize)]
struct Currency {
    id: String,
    series: Series,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    data: Vec<String>,
}

impl MorganStanleyLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin, fund_id, share_class_id] =
            parse_identity(identity, ["ISIN", "fundId", "shareClassId"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            fund_id,
            share_class_id,
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

    pub fn share_class_id(&self) -> &str {
        &self.share_class_id
    }

    fn nav_url(&self) -> String {
        format!(
            "{}/pub/content/dam/im/json/imwebdata/im/data/product/OF/{}/chart/historicalNav.json",
            self.base_url, self.fund_id
        )
    }

    fn to_quotes(&self, nav: HistoricalNav) -> Vec<Quote> {
        let Some(share_class) = nav
            .en
            .share_classes
            .into_iter()
            .find(|s| s.id == self.share_class_id)
        else {
            warn!(isin = %self.isin, share_class = %self.share_class_id, "share class 없음");
            return Vec::new();
        };

        let Some(currency) = share_class.currencies.into_iter().find(|c| c.id == CURRENCY) else {
            warn!(isin = %self.isin, currency = CURRENCY, "통화 시리즈 없음");
            return Vec::new();
        };

        let series = currency.series;
        if series.category.len() != series.data.len() {
            warn!(
                isin = %self.isin,
                dates = series.category.len(),
                values = series.data.len(),
                "날짜와 값의 길이가 다름"
            );
            return Vec::new();
        }

        series
            .category
            .iter()
            .zip(series.data.iter())
            .filter(|(date, value)| !date.trim().is_empty() && !value.trim().is_empty())
            .filter_map(|(raw_date, raw_value)| {
                let date = match NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) {
                    Ok(date) => date,
                    Err(e) => {
                        warn!(isin = %self.isin, date = %raw_date, error = %e, "날짜 파싱 실패");
                        return None;
                    }
                };
                match parse_decimal(raw_value) {
                    Some(close) => Some(Quote::on_day(date, close)),
                    None => {
                        warn!(isin = %self.isin, value = %raw_value, "가격 파싱 실패");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl QuoteLoader for MorganStanleyLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let nav: HistoricalNav = fetch_json(self.client.get(self.nav_url())).await?;
        Ok(self.to_quotes(nav))
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(MorganStanleyLoader::new(name, identity, client.clone())?))
}
