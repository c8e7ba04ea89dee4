//! 공유 HTTP 클라이언트.
//!
//! 프로세스 시작 시 한 번 생성해 모든 로더가 clone해서 사용합니다.
//! 요청 타임아웃이 네트워크 I/O에 걸리는 유일한 기한입니다.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{DataError, Result};

/// 브라우저와 유사한 기본 User-Agent (일부 소스는 기본 UA를 차단)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// HTTP 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// 요청 타임아웃
    pub timeout: Duration,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// 설정으로 HTTP 클라이언트 생성.
pub fn build_http_client(config: &HttpClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(DataError::from)
}

/// 요청을 보내고 본문을 문자열로 반환.
///
/// 4xx/5xx 상태는 `DataError::StatusError`.
pub(crate) async fn fetch_text(request: RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        return Err(DataError::StatusError {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response.text().await?)
}

/// 요청을 보내고 JSON 본문을 역직렬화.
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let body = fetch_text(request).await?;
    serde_json::from_str(&body)
        .map_err(|e| DataError::ParseError(format!("error unmarshaling body: {}", e)))
}
