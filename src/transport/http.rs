use super::TransportError;
use crate::Result;
use reqwest::Proxy;
use std::time::Duration;

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub proxy_url: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 32,
            proxy_url: None,
        }
    }
}

/// Thin wrapper over a pooled `reqwest::Client` bound to one base URL.
///
/// The credential is supplied per call: one transport serves every caller.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| TransportError::Other(format!("invalid proxy url: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body to `{base_url}{path}` with bearer auth.
    pub async fn post_json(
        &self,
        path: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .post(&url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))
    }
}
