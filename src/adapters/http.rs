use crate::domain::ports::PriceSource;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

/// 以 HTTP GET 取得價格 JSON，每個 URL 只嘗試一次
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: Client,
    timeout: Duration,
}

impl HttpPriceSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(EtlError::SourceUnavailable {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let json_data: serde_json::Value = response.json().await?;
        Ok(json_data)
    }
}

impl PriceSource for HttpPriceSource {
    async fn fetch_json(&self, url: &str) -> Option<serde_json::Value> {
        match self.try_fetch(url).await {
            Ok(json_data) => Some(json_data),
            Err(e) => {
                tracing::warn!("⚠️ Failed to load {}: {}", url, e);
                None
            }
        }
    }
}
