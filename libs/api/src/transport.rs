use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};

pub use reqwest::header::HeaderMap;

use crate::error::ApiError;

/// The HTTP seam of the client. The API only ever issues GET requests and
/// expects a UTF-8 JSON body back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String, ApiError>;
}

/// reqwest-backed transport. Owns the timeout policy for every call.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&format!("Smitebot/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|e| ApiError::Transport(e.to_string()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<String, ApiError> {
        let response = self.client.get(url).headers(headers).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
