//! Ports onto the external object store's read surface.

use async_trait::async_trait;
use portal_core::AppResult;

/// One object fetched from the store.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    /// Raw object bytes.
    pub bytes: Vec<u8>,
    /// Content type reported by the store, if any.
    pub content_type: Option<String>,
}

/// Lightweight existence probe (HEAD) against a candidate URL.
#[async_trait]
pub trait ObjectStoreProbe: Send + Sync {
    /// Returns whether the URL responds successfully to a HEAD request.
    ///
    /// Network errors and timeouts are reported as unreachable, never as
    /// hard errors; a probe is advisory only.
    async fn is_reachable(&self, url: &str) -> AppResult<bool>;
}

/// Full object fetch against a candidate URL.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetches the object bytes behind a URL.
    async fn fetch(&self, url: &str) -> AppResult<FetchedObject>;
}
