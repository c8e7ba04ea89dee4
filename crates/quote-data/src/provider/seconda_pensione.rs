//! Seconda Pensione (Amundi) 상품 페이지 로더.
//!
//! 식별자 형식: `ISIN`

use async_trait::async_trait;
use chrono::NaiveDate;
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::{element_text, parse_decimal, selector};
use crate::client::fetch_text;

pub const SOURCE: &str = "secondapensione";

const BASE_URL: &str = "https://www.secondapensione.it";
const DATE_FORMAT: &str = "%d/%m/%Y";

pub struct SecondaPensioneLoader {
    name: String,
    isin: String,
    client: Client,
    base_url: String,
}

impl SecondaPensioneLoader {
    pub fn new(name: &str, identity: &str, client: Client) -> QuoteResult<Self> {
        let [isin] = parse_identity(identity, ["ISIN"])?;
        Ok(Self {
            name: name.to_string(),
            isin,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn page_url(&self) -> String {
        format!(
            "{}/ezjscore/call/ezjscamundibuzz::sfForwardFront::paramsList=service=ProxyProductSheetV3Front&routeId=_en-GB_879_{}_tab_3",
            self.base_url, self.isin
        )
    }

    fn parse_page(&self, body: &str) -> QuoteResult<Vec<Quote>> {
        let row_sel = selector("#tableVl tbody tr")?;
        let cell_sel = selector("td")?;

        let document = Html::parse_document(body);
        let mut quotes = Vec::new();

        for row in document.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            let [raw_date, raw_value, ..] = cells.as_slice() else {
                continue;
            };
            if raw_date.is_empty() || raw_value.is_empty() {
                continue;
            }

            let day = match NaiveDate::parse_from_str(raw_date, DATE_FORMAT) {
                Ok(day) => day,
                Err(e) => {
                    warn!(isin = %self.isin, date = %raw_date, error = %e, "날짜 파싱 실패");
                    continue;
                }
            };

            match parse_decimal(raw_value) {
                Some(close) => quotes.push(Quote::on_day(day, close)),
                None => {
                    warn!(isin = %self.isin, value = %raw_value, "가격 파싱 실패");
                }
            }
        }

        Ok(quotes)
    }
}

#[async_trait]
impl QuoteLoader for SecondaPensioneLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let body = fetch_text(self.client.get(self.page_url())).await?;
        self.parse_page(&body)
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(SecondaPensioneLoader::new(name, identity, client.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PAGE: &str = r#"<div><table id="tableVl"><tbody>
        <tr><td>15/03/2024</td><td>7.412</td></tr>
        <tr><td></td><td></td></tr>
        <tr><td>2024-03-14</td><td>7.398</td></tr>
        <tr><td>13/03/2024</td><td>7.401</td></tr>
    </tbody></table></div>"#;

    #[test]
    fn test_page_url_embeds_isin() {
        let loader = SecondaPensioneLoader::new("Name", "IT0005", Client::new()).unwrap();
        assert!(loader.page_url().ends_with("routeId=_en-GB_879_IT0005_tab_3"));
    }

    #[test]
    fn test_parse_page_skips_blank_and_bad_rows() {
        let loader = SecondaPensioneLoader::new("Name", "IT0005", Client::new()).unwrap();
        let quotes = loader.parse_page(TEST_PAGE).unwrap();

        assert_eq!(
            quotes,
            vec![
                Quote::on_day(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 7.412),
                Quote::on_day(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap(), 7.401),
            ]
        );
    }

    #[test]
    fn test_parse_page_skips_non_finite_values() {
        let loader = SecondaPensioneLoader::new("Name", "IT0005", Client::new()).unwrap();
        let page = r#"<table id="tableVl"><tbody>
            <tr><td>15/03/2024</td><td>NaN</td></tr>
            <tr><td>14/03/2024</td><td>infinity</td></tr>
            <tr><td>13/03/2024</td><td>7.401</td></tr>
        </tbody></table>"#;

        let quotes = loader.parse_page(page).unwrap();

        assert_eq!(
            quotes,
            vec![Quote::on_day(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap(), 7.401)]
        );
    }

    #[tokio::test]
    async fn test_unavailable_page_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let loader = SecondaPensioneLoader::new("Name", "IT0005", Client::new())
            .unwrap()
            .with_base_url(server.url());
        let err = loader.load_quotes().await.unwrap_err();

        assert!(matches!(err, quote_core::QuoteError::Fetch(_)));
    }
}
