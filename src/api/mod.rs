//! REST client for the TrendRadar web backend.

mod adapter;
mod error;
pub mod models;

pub use error::ApiError;

use std::time::Duration;

use log::{debug, warn};
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use models::*;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self, ApiError> {
        let base = Url::parse(&cfg.base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(cfg.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .user_agent(concat!("trendradar-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// `/api/history/{path}` with the whole path as one encoded segment.
    pub fn history_file_url(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("/api/history/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("{} answered {}", resp.url(), status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let mut req = self.http.post(url);
        req = match body {
            Some(b) => req.json(b),
            None => req.header(header::CONTENT_TYPE, "application/json"),
        };
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /* =========================
     * Status
     * ========================= */

    pub async fn status(&self) -> Result<SystemStatus, ApiError> {
        self.get_json::<Envelope<SystemStatus>>("/api/status")
            .await?
            .into_data("loading system status")
    }

    /* =========================
     * Keywords
     * ========================= */

    pub async fn keywords(&self) -> Result<KeywordsPayload, ApiError> {
        self.get_json::<Envelope<KeywordsPayload>>("/api/keywords")
            .await?
            .into_data("loading keywords")
    }

    pub async fn save_keywords(&self, content: &str) -> Result<Ack, ApiError> {
        let body = SaveKeywordsRequest { content };
        self.post_json::<_, Envelope<Value>>("/api/keywords", Some(&body))
            .await?
            .into_ack("saving keywords")
    }

    /* =========================
     * Config
     * ========================= */

    pub async fn config(&self) -> Result<Value, ApiError> {
        self.get_json::<Envelope<Value>>("/api/config")
            .await?
            .into_data("loading config")
    }

    pub async fn save_config(&self, config: &Value) -> Result<Ack, ApiError> {
        self.post_json::<_, Envelope<Value>>("/api/config", Some(config))
            .await?
            .into_ack("saving config")
    }

    /* =========================
     * Platforms
     * ========================= */

    pub async fn platforms(&self) -> Result<Vec<Platform>, ApiError> {
        // A null list is an empty list.
        let env = self.get_json::<Envelope<Option<Vec<Platform>>>>("/api/platforms").await?;
        match env.into_data("loading platforms") {
            Ok(list) => Ok(list.unwrap_or_default()),
            Err(ApiError::MissingData) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn save_platforms(&self, platforms: &[Platform]) -> Result<Ack, ApiError> {
        let body = SavePlatformsRequest { platforms };
        self.post_json::<_, Envelope<Value>>("/api/platforms", Some(&body))
            .await?
            .into_ack("saving platforms")
    }

    /* =========================
     * Actions
     * ========================= */

    pub async fn test_crawl(&self) -> Result<Value, ApiError> {
        let body = self.post_json::<Value, Value>("/api/test-crawl", None).await?;
        adapter::check_action(body, "test crawl")
    }

    pub async fn manual_push(&self) -> Result<Value, ApiError> {
        let body = self.post_json::<Value, Value>("/api/manual-push", None).await?;
        adapter::check_action(body, "manual push")
    }

    /* =========================
     * History
     * ========================= */

    pub async fn history(&self) -> Result<Vec<HistoryFile>, ApiError> {
        self.get_json::<HistoryResponse>("/api/history").await?.into_files()
    }

    pub async fn execution_history(&self) -> Result<Vec<ExecutionRecord>, ApiError> {
        let env = self.get_json::<Envelope<Vec<ExecutionRecord>>>("/api/execution-history").await?;
        match env.into_data("loading execution history") {
            Err(ApiError::MissingData) => Ok(Vec::new()),
            other => other,
        }
    }

    pub async fn history_file(&self, path: &str) -> Result<FileContent, ApiError> {
        let url = self.history_file_url(path)?;
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url.clone())).await?;

        let is_html = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text/html"));
        if is_html {
            return Ok(FileContent::Html { url });
        }

        let text = resp.text().await?;
        Ok(FileContent::Text(adapter::unwrap_text_body(text)?))
    }
}
