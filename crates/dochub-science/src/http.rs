use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, ScienceError};

// ─── HttpClient ───────────────────────────────────────────────────────────────

/// Thin GET/HEAD wrapper over `reqwest`. One attempt per call: no retries,
/// no backoff, no cache. Non-2xx responses become `ScienceError::Status`.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.get_with_headers(url, HeaderMap::new()).await
    }

    pub async fn get_with_headers(&self, url: &str, headers: HeaderMap) -> Result<String> {
        let resp = self.send(url, headers).await?;
        resp.text().await.map_err(ScienceError::Http)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_headers(url, HeaderMap::new()).await
    }

    pub async fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<T> {
        let text = self.get_with_headers(url, headers).await?;
        serde_json::from_str(&text).map_err(|e| ScienceError::Parse(e.to_string()))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.send(url, HeaderMap::new()).await?;
        let bytes = resp.bytes().await.map_err(ScienceError::Http)?;
        Ok(bytes.to_vec())
    }

    /// HEAD request: true only for a 2xx answer. Transport errors count as absent.
    pub async fn exists(&self, url: &str) -> bool {
        debug!(url, "HEAD");
        match self.client.head(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(url, error = %e, "HEAD failed");
                false
            }
        }
    }

    async fn send(&self, url: &str, headers: HeaderMap) -> Result<reqwest::Response> {
        debug!(url, "GET");
        let resp = self.client.get(url).headers(headers).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "request failed");
            return Err(ScienceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}
