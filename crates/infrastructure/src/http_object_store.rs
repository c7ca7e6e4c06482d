//! HTTP client against the object store's public read endpoint.

use std::time::Duration;

use async_trait::async_trait;
use portal_application::{FetchedObject, ObjectFetcher, ObjectStoreProbe};
use portal_core::{AppError, AppResult};
use tracing::debug;

/// Per-request deadline for HEAD probes; probes are advisory and must stay
/// cheap next to the overall proxy deadline.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Some storage frontends answer 403 to unadorned non-browser agents.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; woreda-portal/0.1)";

/// reqwest-backed probe and fetcher for stored objects.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
}

impl HttpObjectStore {
    /// Creates a store client with a shared connection pool.
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build object store client: {error}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ObjectStoreProbe for HttpObjectStore {
    async fn is_reachable(&self, url: &str) -> AppResult<bool> {
        match self
            .client
            .head(url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(error) => {
                debug!(url, %error, "head probe failed");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl ObjectFetcher for HttpObjectStore {
    async fn fetch(&self, url: &str) -> AppResult<FetchedObject> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("failed to fetch '{url}': {error}")))?;

        if !response.status().is_success() {
            return Err(AppError::NotFound(format!(
                "object store answered {} for '{url}'",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let bytes = response.bytes().await.map_err(|error| {
            AppError::Internal(format!("failed to read body of '{url}': {error}"))
        })?;

        Ok(FetchedObject {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
