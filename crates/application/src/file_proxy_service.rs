//! Server-side fetching of stored objects on a validated requester's behalf.
//!
//! Some viewers cannot follow a redirect to the object store (embedded PDF
//! frames, older mobile browsers), so the portal can stream the bytes
//! itself. The proxy reuses the resolver's candidate normalization and tries
//! each candidate in order under one overall deadline.

use std::sync::Arc;
use std::time::Duration;

use portal_core::{AppError, AppResult};
use portal_domain::AccessRequest;
use tracing::warn;

use crate::document_ports::DocumentRepository;
use crate::object_store_ports::{FetchedObject, ObjectFetcher};
use crate::resource_resolver::{ObjectStoreConfig, candidate_urls};

/// Overall deadline for fetching one object, candidates included.
pub const PROXY_FETCH_TIMEOUT_SECS: u64 = 30;

/// Content type served when the store does not report one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// One object ready to stream back to the requester.
#[derive(Debug, Clone)]
pub struct ProxiedFile {
    /// Raw object bytes.
    pub bytes: Vec<u8>,
    /// Content type to serve, never empty.
    pub content_type: String,
    /// Original filename from the upload record.
    pub file_name: String,
}

/// Fetches in-scope objects through the server.
#[derive(Clone)]
pub struct FileProxyService {
    documents: Arc<dyn DocumentRepository>,
    fetcher: Arc<dyn ObjectFetcher>,
    config: ObjectStoreConfig,
    fetch_timeout: Duration,
}

impl FileProxyService {
    /// Creates a proxy service with the default 30-second deadline.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        fetcher: Arc<dyn ObjectFetcher>,
        config: ObjectStoreConfig,
    ) -> Self {
        Self {
            documents,
            fetcher,
            config,
            fetch_timeout: Duration::from_secs(PROXY_FETCH_TIMEOUT_SECS),
        }
    }

    /// Overrides the overall fetch deadline.
    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetches the object behind `reference` for a validated access request.
    ///
    /// The same scope rule as resolution applies: references without a
    /// matching in-scope upload record read as `NotFound`. Exceeding the
    /// deadline maps to `Timeout`.
    pub async fn fetch(
        &self,
        request: &AccessRequest,
        reference: &str,
    ) -> AppResult<ProxiedFile> {
        let document = self
            .documents
            .find_by_object_url(&request.woreda_id, reference)
            .await?
            .ok_or_else(|| AppError::NotFound("file not found or access denied".to_owned()))?;

        let candidates = candidate_urls(reference, &self.config)?;

        let fetched = tokio::time::timeout(self.fetch_timeout, self.try_candidates(&candidates))
            .await
            .map_err(|_| {
                AppError::Timeout("timed out fetching the file from storage".to_owned())
            })??;

        Ok(ProxiedFile {
            bytes: fetched.bytes,
            content_type: fetched
                .content_type
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_owned()),
            file_name: document.file_name,
        })
    }

    /// Tries each candidate in order, keeping the first successful fetch.
    async fn try_candidates(&self, candidates: &[String]) -> AppResult<FetchedObject> {
        for candidate in candidates {
            match self.fetcher.fetch(candidate).await {
                Ok(object) => return Ok(object),
                Err(error) => {
                    warn!(url = candidate.as_str(), %error, "candidate fetch failed; trying next");
                }
            }
        }

        Err(AppError::NotFound(
            "failed to fetch the file from storage".to_owned(),
        ))
    }
}
