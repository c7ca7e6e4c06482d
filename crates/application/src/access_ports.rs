//! Persistence ports for access requests and their temporary tokens.

use async_trait::async_trait;
use portal_core::{AppResult, WoredaId};
use portal_domain::{AccessCode, AccessRequest, RequestStatus};
use uuid::Uuid;

/// Input for creating a new access request.
#[derive(Debug, Clone)]
pub struct NewAccessRequest {
    /// Administrative scope the request is made against.
    pub woreda_id: WoredaId,
    /// QR-minted code presented by the requester.
    pub code: AccessCode,
    /// Best-effort client network origin, advisory only.
    pub ip_address: Option<String>,
}

/// Repository port for access request persistence.
#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    /// Stores a new pending request.
    async fn create(&self, request: NewAccessRequest) -> AppResult<AccessRequest>;

    /// Fetches a request by its identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AccessRequest>>;

    /// Fetches a request by the code presented at redemption time.
    async fn find_by_code(&self, code: &AccessCode) -> AppResult<Option<AccessRequest>>;

    /// Atomically moves a request from `from` to `to`.
    ///
    /// Returns true when this call performed the transition, false when the
    /// request was no longer in `from` (or does not exist). This
    /// compare-and-set is the concurrency contract for the approval gate.
    async fn transition(&self, id: Uuid, from: RequestStatus, to: RequestStatus)
    -> AppResult<bool>;

    /// Lists requests for administrative review.
    ///
    /// Pending requests are always included; resolved requests only when
    /// created at or after `resolved_since`.
    async fn list_for_review(
        &self,
        woreda_id: &WoredaId,
        resolved_since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Vec<AccessRequest>>;
}

/// Temporary access token record as persisted in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryAccessRecord {
    /// Token record identifier.
    pub id: Uuid,
    /// Owning access request (exactly one token per approved request).
    pub request_id: Uuid,
    /// Scope inherited from the owning request.
    pub woreda_id: WoredaId,
    /// Opaque bearer token value.
    pub token: String,
    /// Absolute expiry instant.
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Issuance instant.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Repository port for temporary access token persistence.
#[async_trait]
pub trait TemporaryAccessRepository: Send + Sync {
    /// Inserts a token for the request unless one already exists.
    ///
    /// Always returns the canonical record for the request, so two racing
    /// approvals observe the same single token.
    async fn create_or_get(
        &self,
        request_id: Uuid,
        woreda_id: &WoredaId,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<TemporaryAccessRecord>;

    /// Looks up a token record by its bearer value.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<TemporaryAccessRecord>>;

    /// Looks up the token issued for a request, if any.
    async fn find_by_request(&self, request_id: Uuid) -> AppResult<Option<TemporaryAccessRecord>>;
}
