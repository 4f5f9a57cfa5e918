//! HTTP client for the aggregator backend.

use std::time::Duration;

use async_trait::async_trait;
use pricecompare_core::Product;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::StorefrontConfig;
use crate::types::{SearchRequest, SearchResponse};

pub const PRODUCTS_PATH: &str = "/api/products";
pub const SEARCH_PATH: &str = "/search";
pub const SUGGEST_PATH: &str = "/api/search";

/// Prefixes shorter than this never reach the backend.
pub const MIN_SUGGEST_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Backend operations the storefront depends on.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// `GET /api/products`: the full catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `POST /search` with `{"query": ...}`.
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError>;

    /// `GET /api/search?q=...`: title suggestions for a prefix.
    async fn suggest(&self, prefix: &str) -> Result<Vec<String>, ApiError>;
}

/// `ProductApi` over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the status, then decode the body as JSON.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let resp = self.client.get(self.url(PRODUCTS_PATH)).send().await?;
        let rows: Vec<Value> = Self::decode(resp).await?;
        Ok(products_from_rows(rows))
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let body = SearchRequest {
            query: query.to_string(),
        };
        let resp = self
            .client
            .post(self.url(SEARCH_PATH))
            .json(&body)
            .send()
            .await?;

        let parsed: SearchResponse = Self::decode(resp).await?;
        Ok(products_from_rows(parsed.results))
    }

    async fn suggest(&self, prefix: &str) -> Result<Vec<String>, ApiError> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_SUGGEST_CHARS {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .get(self.url(SUGGEST_PATH))
            .query(&[("q", prefix)])
            .send()
            .await?;

        let mut titles: Vec<String> = Self::decode(resp).await?;
        titles.truncate(MAX_SUGGESTIONS);
        Ok(titles)
    }
}

/// Decode rows one at a time. A row that is not a product is logged and
/// skipped; the rest keep their order.
pub fn products_from_rows(rows: Vec<Value>) -> Vec<Product> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<Product>(row) {
            Ok(product) => Some(product),
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed product row");
                None
            }
        })
        .collect()
}
