use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::config::HeaderProfile;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("Empty response for {0}")]
    EmptyBody(String),
}

/// Something that turns a URL into page markup.
pub trait PageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Single-shot HTTP fetcher. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(headers: &HeaderProfile, timeout: Duration) -> Result<Self, FetchError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&headers.accept_language)?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&headers.user_agent)
            .default_headers(default_headers)
            .build()?;

        Ok(Self { client })
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }
        Ok(html)
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);
        self.get_html(url)
            .await
            .inspect_err(|e| log::error!("Fetch error for {}: {}", url, e))
    }
}
