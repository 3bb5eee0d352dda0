//! HTTP gateway to the catalog service and both recommendation engines
//!
//! ```text
//! CatalogLoader / Orchestrator
//!       │  AdvisorApi (trait)
//!       ▼
//! HttpAdvisorApi ── GET {base}/heroes, /recommendations/... ──► advisor service
//!       │
//!       ▼
//! status check → JSON decode / wire::normalize → AdvisorError on failure
//! ```
//!
//! Non-2xx answers become `AdvisorError::Server` with the status and the
//! service's `detail` text; transport failures become `AdvisorError::Network`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use advisor_core::error::{engine_origin, CATALOG_ORIGIN};
use advisor_core::{
    wire, AdvisorConfig, AdvisorError, Hero, HeroId, ItemRecord, PayloadError,
    RecommendationRequest, RecommendationResult, SkillRecord,
};

/// Everything the client consumes from the remote service
#[async_trait]
pub trait AdvisorApi: Send + Sync {
    async fn list_heroes(&self) -> Result<Vec<Hero>, AdvisorError>;
    async fn get_hero(&self, id: HeroId) -> Result<Hero, AdvisorError>;
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, AdvisorError>;
    async fn list_items(&self) -> Result<Vec<ItemRecord>, AdvisorError>;
    async fn fetch_recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, AdvisorError>;
}

/// `reqwest`-backed implementation
#[derive(Clone)]
pub struct HttpAdvisorApi {
    client: Client,
    base_url: String,
}

impl HttpAdvisorApi {
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AdvisorError::network("http client", e.to_string()))?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`, returning the status and body of a 2xx response.
    async fn get(
        &self,
        origin: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(u16, Vec<u8>), AdvisorError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(origin, %url, ?query, "sending request");
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AdvisorError::network(origin, describe(&e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AdvisorError::network(origin, describe(&e)))?
            .to_vec();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(origin, %url, status = status.as_u16(), elapsed_ms, "request failed");
            return Err(AdvisorError::server(
                origin,
                status.as_u16(),
                error_detail(&body),
            ));
        }

        info!(origin, %url, status = status.as_u16(), elapsed_ms, "request ok");
        Ok((status.as_u16(), body))
    }

    async fn get_catalog<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdvisorError> {
        let (status, body) = self.get(CATALOG_ORIGIN, path, &[]).await?;
        serde_json::from_slice(&body).map_err(|e| {
            AdvisorError::server(CATALOG_ORIGIN, status, PayloadError::from(e).to_string())
        })
    }
}

#[async_trait]
impl AdvisorApi for HttpAdvisorApi {
    async fn list_heroes(&self) -> Result<Vec<Hero>, AdvisorError> {
        self.get_catalog("/heroes").await
    }

    async fn get_hero(&self, id: HeroId) -> Result<Hero, AdvisorError> {
        self.get_catalog(&format!("/heroes/{}", id)).await
    }

    async fn list_skills(&self) -> Result<Vec<SkillRecord>, AdvisorError> {
        self.get_catalog("/skills").await
    }

    async fn list_items(&self) -> Result<Vec<ItemRecord>, AdvisorError> {
        self.get_catalog("/items").await
    }

    async fn fetch_recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, AdvisorError> {
        let origin = engine_origin(request.engine);
        let (status, body) = self
            .get(&origin, &request.path(), &request.query_pairs())
            .await?;
        wire::normalize(request.engine, request.mode, &body)
            .map_err(|e| e.into_server_error(request.engine, status))
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("could not connect: {}", err)
    } else {
        err.to_string()
    }
}

const MAX_DETAIL_CHARS: usize = 300;

/// The service reports failures as `{"detail": "..."}`; fall back to the raw body.
fn error_detail(body: &[u8]) -> String {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    if detail.chars().count() > MAX_DETAIL_CHARS {
        let truncated: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{}...", truncated)
    } else {
        detail
    }
}
