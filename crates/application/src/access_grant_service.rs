//! Access grant workflow: request creation, the approval gate, and token
//! issuance/validation.
//!
//! Tokens are cryptographically random, bound 1:1 to an approved request,
//! and time-limited. Validation is the sole authorization primitive for the
//! document-serving endpoints.

mod approval;
mod status;
mod token_crypto;

use std::sync::Arc;

use portal_core::{AppResult, WoredaId};
use portal_domain::{AccessCode, AccessRequest};

use crate::access_ports::{AccessRequestRepository, NewAccessRequest, TemporaryAccessRepository};

/// Validity window for a temporary access token, in hours.
///
/// Long enough for one document-review session; well under a day.
pub const TOKEN_VALIDITY_HOURS: i64 = 4;

/// How long resolved requests stay visible in administrative listings, in
/// hours. Pending requests are always shown regardless of age.
pub const RESOLVED_VISIBILITY_HOURS: i64 = 24;

/// Application service for the temporary access grant workflow.
#[derive(Clone)]
pub struct AccessGrantService {
    requests: Arc<dyn AccessRequestRepository>,
    tokens: Arc<dyn TemporaryAccessRepository>,
}

impl AccessGrantService {
    /// Creates a new access grant service.
    #[must_use]
    pub fn new(
        requests: Arc<dyn AccessRequestRepository>,
        tokens: Arc<dyn TemporaryAccessRepository>,
    ) -> Self {
        Self { requests, tokens }
    }

    /// Registers a visitor's request to access a woreda's documents.
    ///
    /// Redeeming a code that already has a request returns the existing
    /// record instead of erroring, so a page reload does not duplicate the
    /// request or reset its state.
    pub async fn create_request(
        &self,
        woreda_id: WoredaId,
        code: AccessCode,
        ip_address: Option<String>,
    ) -> AppResult<AccessRequest> {
        if let Some(existing) = self.requests.find_by_code(&code).await? {
            return Ok(existing);
        }

        self.requests
            .create(NewAccessRequest {
                woreda_id,
                code,
                ip_address,
            })
            .await
    }

    /// Mints a fresh access code for QR generation.
    pub fn mint_code(&self) -> AppResult<AccessCode> {
        token_crypto::generate_code(chrono::Utc::now())
    }
}
