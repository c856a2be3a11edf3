// Analysis Service Client
// HTTP calls to the tweet classification backend (analyze, load more, profile, deep analysis)

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::models::{
    AnalysisPage, AnalyzeRequest, DeepAnalysisItem, DeepAnalysisRequest, DeepAnalysisResponse,
    LoadMoreRequest, ProfileInfo, ServiceErrorBody,
};
use crate::services::config_store::AppConfig;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("Missing content in response")]
    MissingContent,
}

impl ClientError {
    /// The `error` field of a structured service failure, if there is one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::ApiError { message, .. } => serde_json::from_str::<ServiceErrorBody>(message)
                .ok()
                .map(|body| body.error)
                .filter(|e| !e.trim().is_empty()),
            _ => None,
        }
    }

    /// Message safe to show a user: the service's own message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or_else(|| fallback.to_string())
    }
}

/// Operations the results view needs from the analysis backend.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Initial submission: first page plus the service's own verdict message.
    async fn analyze(&self, username: &str, num_tweets: u32) -> Result<AnalysisPage, ClientError>;

    /// Next page of analyzed tweets after `cursor`.
    async fn fetch_page(
        &self,
        username: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<AnalysisPage, ClientError>;

    async fn fetch_profile(&self, username: &str) -> Result<ProfileInfo, ClientError>;

    /// Narrative analysis over already classified tweets.
    async fn deep_analysis(&self, items: &[DeepAnalysisItem]) -> Result<String, ClientError>;
}

pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_proxy(base_url: &str, timeout: Duration, proxy_url: &str) -> Result<Self, ClientError> {
        let proxy = reqwest::Proxy::all(proxy_url)?;
        let client = Client::builder().timeout(timeout).proxy(proxy).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let base_url = config.service.resolved_base_url();
        let timeout = Duration::from_secs(config.service.timeout_secs);
        match config.proxy_url() {
            Some(proxy) => Self::with_proxy(&base_url, timeout, proxy),
            None => Self::new(&base_url, timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        start: Instant,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        debug!(
            endpoint,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "service.response"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::JsonError(e.to_string()))
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn analyze(&self, username: &str, num_tweets: u32) -> Result<AnalysisPage, ClientError> {
        let request = AnalyzeRequest {
            username: username.to_string(),
            num_tweets,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.url("analyze"))
            .json(&request)
            .send()
            .await?;

        self.read_json("analyze", start, response).await
    }

    async fn fetch_page(
        &self,
        username: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<AnalysisPage, ClientError> {
        let request = LoadMoreRequest {
            username: username.to_string(),
            num_tweets: page_size,
            pagination_token: cursor.map(str::to_string),
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.url("load-more-tweets"))
            .json(&request)
            .send()
            .await?;

        self.read_json("load-more-tweets", start, response).await
    }

    async fn fetch_profile(&self, username: &str) -> Result<ProfileInfo, ClientError> {
        let start = Instant::now();
        let response = self
            .client
            .get(self.url("fetch-profile"))
            .query(&[("username", username)])
            .send()
            .await?;

        self.read_json("fetch-profile", start, response).await
    }

    async fn deep_analysis(&self, items: &[DeepAnalysisItem]) -> Result<String, ClientError> {
        let request = DeepAnalysisRequest {
            tweet_data: items.to_vec(),
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.url("chatgpt-analysis"))
            .json(&request)
            .send()
            .await?;

        let data: DeepAnalysisResponse = self.read_json("chatgpt-analysis", start, response).await?;
        data.response
            .filter(|text| !text.trim().is_empty())
            .ok_or(ClientError::MissingContent)
    }
}
