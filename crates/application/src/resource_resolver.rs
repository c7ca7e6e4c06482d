//! Resolution of stored-object references into fetchable public URLs.
//!
//! References recorded at upload time may point at the store's authenticated
//! upload endpoint or its public read endpoint, may carry the bucket name as
//! a path prefix, and may be percent-encoded zero, one, or two times. The
//! resolver normalizes all of that into candidate URLs, probes them in
//! preference order, and reports a best-effort accessibility flag instead of
//! hard-erroring when probes fail.

mod candidates;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use portal_core::{AppError, AppResult};
use portal_domain::AccessRequest;
use tracing::warn;
use url::Url;

pub use candidates::{CandidateStrategy, candidate_urls};

use crate::document_ports::DocumentRepository;
use crate::object_store_ports::ObjectStoreProbe;

/// Settings describing the external object store's two endpoint families.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    public_base: String,
    upload_host: String,
    bucket_name: String,
}

impl ObjectStoreConfig {
    /// Creates a validated object-store configuration.
    ///
    /// `public_base_url` is the root of the public read endpoint;
    /// `upload_url` is the authenticated write endpoint whose host is used
    /// to recognize upload-form references.
    pub fn new(
        public_base_url: &str,
        upload_url: &str,
        bucket_name: impl Into<String>,
    ) -> AppResult<Self> {
        let public_base = Url::parse(public_base_url).map_err(|error| {
            AppError::Validation(format!("invalid object store public url: {error}"))
        })?;

        let upload = Url::parse(upload_url).map_err(|error| {
            AppError::Validation(format!("invalid object store upload url: {error}"))
        })?;
        let upload_host = upload
            .host_str()
            .ok_or_else(|| {
                AppError::Validation("object store upload url has no host".to_owned())
            })?
            .to_owned();

        Ok(Self {
            public_base: public_base.as_str().trim_end_matches('/').to_owned(),
            upload_host,
            bucket_name: bucket_name.into(),
        })
    }

    /// Returns the public read base URL without a trailing slash.
    #[must_use]
    pub fn public_base(&self) -> &str {
        self.public_base.as_str()
    }

    /// Returns the host of the authenticated upload endpoint.
    #[must_use]
    pub fn upload_host(&self) -> &str {
        self.upload_host.as_str()
    }

    /// Returns the bucket name that may prefix stored paths.
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        self.bucket_name.as_str()
    }
}

/// Outcome of resolving an object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    /// Canonical publicly-fetchable URL.
    pub public_url: String,
    /// Original filename from the upload record.
    pub file_name: String,
    /// Best-effort reachability indicator, advisory for the UI only.
    pub is_accessible: bool,
}

/// Resolves validated object references into public URLs.
#[derive(Clone)]
pub struct ResourceResolver {
    documents: Arc<dyn DocumentRepository>,
    probe: Arc<dyn ObjectStoreProbe>,
    config: ObjectStoreConfig,
}

impl ResourceResolver {
    /// Creates a new resolver.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        probe: Arc<dyn ObjectStoreProbe>,
        config: ObjectStoreConfig,
    ) -> Self {
        Self {
            documents,
            probe,
            config,
        }
    }

    /// Resolves `reference` for a validated access request.
    ///
    /// The reference must match a document upload record inside the
    /// request's scope; out-of-scope references read as `NotFound` so the
    /// response does not reveal whether the object exists elsewhere.
    pub async fn resolve(
        &self,
        request: &AccessRequest,
        reference: &str,
    ) -> AppResult<ResolvedObject> {
        let document = self
            .documents
            .find_by_object_url(&request.woreda_id, reference)
            .await?
            .ok_or_else(|| AppError::NotFound("file not found or access denied".to_owned()))?;

        let candidates = candidate_urls(reference, &self.config)?;
        let (public_url, probed) = self.select_candidate(&candidates).await?;

        let is_accessible = match probed {
            Some(outcome) => outcome,
            None => self.probe.is_reachable(&public_url).await.unwrap_or(false),
        };

        Ok(ResolvedObject {
            public_url,
            file_name: document.file_name,
            is_accessible,
        })
    }

    /// Picks the first candidate that answers a HEAD probe.
    ///
    /// A single candidate is taken without probing (the accessibility check
    /// happens afterwards); when every probe fails the last, aggressively
    /// normalized candidate is the deterministic fallback.
    async fn select_candidate(&self, urls: &[String]) -> AppResult<(String, Option<bool>)> {
        if urls.len() > 1 {
            for url in urls {
                if self.probe.is_reachable(url).await.unwrap_or(false) {
                    return Ok((url.clone(), Some(true)));
                }
            }

            warn!("no candidate url answered its probe; falling back to the normalized form");
            return urls
                .last()
                .cloned()
                .map(|fallback| (fallback, Some(false)))
                .ok_or_else(|| {
                    AppError::Internal("candidate generation produced no urls".to_owned())
                });
        }

        urls.first()
            .cloned()
            .map(|only| (only, None))
            .ok_or_else(|| AppError::Internal("candidate generation produced no urls".to_owned()))
    }
}
