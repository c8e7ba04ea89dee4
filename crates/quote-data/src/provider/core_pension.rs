//! CorePension NAV 이력 로더.
//!
//! 식별자 형식: `ISIN` (추가 파라미터 없음)
//!
//! 브라우저 요청이 아니면 거부하므로 Origin/Sec-Fetch 헤더를 함께 보냅니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use quote_core::{Quote, QuoteLoader, QuoteResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::identity::parse_identity;
use super::parse::finite_close;
use crate::client::fetch_json;

pub const SOURCE: &str = "corepension";

const BASE_URL: &str = "https://www.corepension.it";
const SHARE_PATH: &str = "/product-services/fdr/share/v2/full";

pub struct CorePensionLoader {
    name: String,
    isin: String,
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct RequestPayload<'a> {
    fields: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseItem {
    #[serde(default)]
    nav_history: Vec<NavPoint>,
}

#[derive(Debug, Deserialize)]
struct NavPoint {
    date: String,
    value: Option<f64>,
}

impl CorePensionLoader {
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

    fn browser_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(BASE_URL));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
        headers
    }

    fn to_quotes(&self, items: Vec<ResponseItem>) -> Vec<Quote> {
        items
            .into_iter()
            .flat_map(|item| item.nav_history)
            .filter_map(|point| {
                let Some(close) = point.value else {
                    warn!(isin = %self.isin, date = %point.date, "NAV 값 없음");
                    return None;
                };
                let Some(close) = finite_close(close) else {
                    warn!(isin = %self.isin, date = %point.date, close, "유효하지 않은 NAV 건너뜀");
                    return None;
                };
                match parse_nav_date(&point.date) {
                    Some(quote_date) => Some(quote_date.with_close(close)),
                    None => {
                        warn!(isin = %self.isin, date = %point.date, "날짜 파싱 실패");
                        None
                    }
                }
            })
            .collect()
    }
}

/// 파싱된 NAV 날짜 (타임스탬프 또는 달력 날짜).
enum NavDate {
    Instant(DateTime<chrono::FixedOffset>),
    Day(NaiveDate),
}

impl NavDate {
    fn with_close(self, close: f32) -> Quote {
        match self {
            NavDate::Instant(date) => Quote::new(date, close),
            NavDate::Day(day) => Quote::on_day(day, close),
        }
    }
}

fn parse_nav_date(raw: &str) -> Option<NavDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(NavDate::Instant)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(NavDate::Day))
        .ok()
}

#[async_trait]
impl QuoteLoader for CorePensionLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn isin(&self) -> &str {
        &self.isin
    }

    async fn load_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let request = self
            .client
            .post(format!("{}{}/{}", self.base_url, SHARE_PATH, self.isin))
            .headers(self.browser_headers())
            .json(&RequestPayload {
                fields: ["navHistory"],
            });
        let items: Vec<ResponseItem> = fetch_json(request).await?;

        Ok(self.to_quotes(items))
    }
}

pub fn factory(name: &str, identity: &str, client: &Client) -> QuoteResult<Arc<dyn QuoteLoader>> {
    Ok(Arc::new(CorePensionLoader::new(name, identity, client.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_parse_nav_date_formats() {
        let utc = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

        let quote = parse_nav_date("2024-03-28T00:00:00.000Z").unwrap().with_close(1.0);
        assert_eq!(quote.utc_date(), utc(2024, 3, 28));

        let quote = parse_nav_date("2024-03-29").unwrap().with_close(1.0);
        assert_eq!(quote.utc_date(), utc(2024, 3, 29));

        assert!(parse_nav_date("29/03/2024").is_none());
    }

    #[tokio::test]
    async fn test_load_quotes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/product-services/fdr/share/v2/full/IT0001")
            .match_header("sec-fetch-mode", "cors")
            .match_body(Matcher::Json(json!({"fields": ["navHistory"]})))
            .with_status(200)
            .with_body(
                r#"[{"_id": "x", "navHistory": [
                    {"date": "2024-03-28T00:00:00.000Z", "value": 12.5},
                    {"date": "not a date", "value": 1.0},
                    {"date": "2024-03-29", "value": 12.75}
                ]}]"#,
            )
            .create_async()
            .await;

        let loader = CorePensionLoader::new("Name", "IT0001", Client::new())
            .unwrap()
            .with_base_url(server.url());
        let quotes = loader.load_quotes().await.unwrap();

        mock.assert_async().await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].close, 12.75);
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/product-services/fdr/share/v2/full/IT0001")
            .with_status(200)
            .with_body("<html>blocked</html>")
            .create_async()
            .await;

        let loader = CorePensionLoader::new("Name", "IT0001", Client::new())
            .unwrap()
            .with_base_url(server.url());
        let err = loader.load_quotes().await.unwrap_err();

        assert!(matches!(err, quote_core::QuoteError::Parse(_)));
    }
}
