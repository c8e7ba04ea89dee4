//! Fondo FonTe 월별 수익 페이지 로더.
//!
//! 식별자 형식: `ISIN.urlName` (urlName은 `comparto-{urlName}` 경로 일부)
//!
//! 페이지에는 연도 제목(`h5.toggle-acf`)과 같은 순서의 월별 블록
//! (`div.toggle-content-acf`)이 나열됩니다. 월별 값의 날짜는 그 달의 말일입니다.

use async_trait::async_trait;
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::{element_text, italian_month, last_day_of_month, parse_price, selector};
use crate::client::fetch_text;

pub const SOURCE: &str = "fonte";

const BASE_URL: &str = "https://www.fondofonte.it";

pub struct FonTeLoader {
    name: String,
    isin: String,
    url_name: String,
    client: Client,
    base_url: String,
}

impl FonTeLoader {
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

    fn page_url(&self) -> String {
        format!(
            "{}/gestione-finanziaria/i-valori-quota-dei-comparti/comparto-{}/",
            self.base_url, self.url_name
        )
    }

    fn parse_page(&self, body: &str) -> QuoteResult<Vec<Quote>> {
        let article_sel = selector("article.content-text-page")?;
        let year_sel = selector("h5.toggle-acf")?;
        let block_sel = selector("div.toggle-content-acf")?;
        let row_sel = selector("div.toggle_element_row")?;
        let span_sel = selector("span")?;

        let document = Html::parse_document(body);
        let mut quotes = Vec::new();

        for article in document.select(&article_sel) {
            let years: Vec<String> = article.select(&year_sel).map(element_text).collect();
            let blocks: Vec<_> = article.select(&block_sel).collect();

            if years.len() != blocks.len() {
                warn!(
                    isin = %self.isin,
                    years = years.len(),
                    blocks = blocks.len(),
                    "연도 제목과 블록 수가 다름"
                );
            }

            for (raw_year, block) in years.iter().zip(blocks) {
                let Ok(year) = raw_year.parse::<i32>() else {
                    warn!(isin = %self.isin, year = %raw_year, "연도 파싱 실패");
                    continue;
                };

                for row in block.select(&row_sel) {
                    let spans: Vec<String> = row.select(&span_sel).map(element_text).collect();
                    let [raw_month, raw_value, ..] = spans.as_slice() else {
                        warn!(isin = %self.isin, year, "불완전한 행 건너뜀");
                        continue;
                    };

                    let Some(day) = italian_month(raw_month)
                        .and_then(|month| last_day_of_month(year, month))
                    else {
                        warn!(isin = %self.isin, year, month = %raw_month, "월 파싱 실패");
                        continue;
                    };

                    match parse_price(raw_value) {
                        Some(close) => quotes.push(Quote::on_day(day, close)),
                        None => {
                            warn!(isin = %self.isin, %day, value = %raw_value, "가격 파싱 실패");
                        }
                    }
                }
            }
        }

        Ok(quotes)
    }
}

#[async_trait]
impl QuoteLoader for FonTeLoader {
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
    Ok(Arc::new(FonTeLoader::new(name, identity, client.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAGE_PATH: &str = "/gestione-finanziaria/i-valori-quota-dei-comparti/comparto-crescita/";

    const TEST_PAGE: &str = r#"<html><body>
        <article class="content-text-page">
            <h5 class="toggle-acf">2024</h5>
            <div class="toggle-content-acf">
                <div class="toggle_element_row"><span>Febbraio</span><span> 12,482 </span></div>
                <div class="toggle_element_row"><span>Gennaio</span><span>12,301</span></div>
            </div>
            <h5 class="toggle-acf">2023</h5>
            <div class="toggle-content-acf">
                <div class="toggle_element_row"><span>Dicembre</span><span>12,105</span></div>
                <div class="toggle_element_row"><span>Rendimento</span><span>5,2%</span></div>
                <div class="toggle_element_row"><span>Novembre</span><span>n.d.</span></div>
            </div>
        </article>
    </body></html>"#;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_page() {
        let loader = FonTeLoader::new("Name", "ISIN.crescita", Client::new()).unwrap();
        let quotes = loader.parse_page(TEST_PAGE).unwrap();

        assert_eq!(
            quotes,
            vec![
                Quote::on_day(day(2024, 2, 29), 12.482),
                Quote::on_day(day(2024, 1, 31), 12.301),
                Quote::on_day(day(2023, 12, 31), 12.105),
            ]
        );
    }

    #[test]
    fn test_unrecognized_layout_is_empty() {
        let loader = FonTeLoader::new("Name", "ISIN.crescita", Client::new()).unwrap();
        let quotes = loader.parse_page("<html><body><p>manutenzione</p></body></html>").unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_load_quotes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PAGE_PATH)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(TEST_PAGE)
            .create_async()
            .await;

        let loader = FonTeLoader::new("Name", "ISIN.crescita", Client::new())
            .unwrap()
            .with_base_url(server.url());
        let quotes = loader.load_quotes().await.unwrap();

        mock.assert_async().await;
        assert_eq!(quotes.len(), 3);
    }
}
