use portal_core::{AdminIdentity, AppError, AppResult};
use portal_domain::{AccessCode, AccessRequest, RequestStatus, RequestStatusView};

use super::{AccessGrantService, RESOLVED_VISIBILITY_HOURS};

impl AccessGrantService {
    /// Answers a poller's "has my request state changed?" question.
    ///
    /// The token travels with the first `approved` observation; polling the
    /// same code again returns the same token, never a reissue.
    pub async fn request_status(&self, code: &AccessCode) -> AppResult<RequestStatusView> {
        let request = self
            .requests
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("unknown access code '{code}'")))?;

        match request.status {
            RequestStatus::Pending => Ok(RequestStatusView::Pending),
            RequestStatus::Denied => Ok(RequestStatusView::Denied),
            RequestStatus::Approved => {
                let record = self
                    .tokens
                    .find_by_request(request.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "approved request '{}' has no access token",
                            request.id
                        ))
                    })?;

                Ok(RequestStatusView::Approved {
                    token: record.token,
                })
            }
        }
    }

    /// Validates a bearer token and returns its authorization context.
    ///
    /// A token is valid if and only if it is known, unexpired, and its
    /// owning request is still approved. The returned request is the
    /// complete authorization context for document-serving endpoints.
    pub async fn validate_token(&self, token: &str) -> AppResult<AccessRequest> {
        let invalid = || AppError::Unauthorized("invalid or expired access token".to_owned());

        let record = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or_else(invalid)?;

        if record.expires_at <= chrono::Utc::now() {
            return Err(invalid());
        }

        let request = self
            .requests
            .find_by_id(record.request_id)
            .await?
            .ok_or_else(invalid)?;

        if request.status != RequestStatus::Approved {
            return Err(invalid());
        }

        Ok(request)
    }

    /// Lists requests awaiting or recently past administrative review.
    pub async fn list_for_review(&self, actor: &AdminIdentity) -> AppResult<Vec<AccessRequest>> {
        let resolved_since =
            chrono::Utc::now() - chrono::Duration::hours(RESOLVED_VISIBILITY_HOURS);

        self.requests
            .list_for_review(actor.woreda_id(), resolved_since)
            .await
    }
}
