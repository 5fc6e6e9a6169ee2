//! HTTP client construction and shared request plumbing

use riftbound_common::{MarketError, MarketResult};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CardTrader REST API v2
pub const DEFAULT_BASE_URL: &str = "https://api.cardtrader.com/api/v2";

const USER_AGENT: &str = "collection_cost/1.0";

/// Authenticated CardTrader API client
#[derive(Debug, Clone)]
pub struct CardTraderClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    api_token: String,
}

impl CardTraderClient {
    /// Create a client against the public API with the default 30 s request timeout
    pub fn new(api_token: impl Into<String>) -> MarketResult<Self> {
        Self::with_timeout(api_token, Duration::from_secs(30))
    }

    pub fn with_timeout(api_token: impl Into<String>, timeout: Duration) -> MarketResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
        })
    }

    /// Point the client at another API root (mock servers, staging)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` with bearer auth and decode the JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> MarketResult<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
