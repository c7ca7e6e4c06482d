use portal_core::{AdminIdentity, AppError, AppResult};
use portal_domain::{AccessRequest, RequestStatus};
use uuid::Uuid;

use super::{AccessGrantService, TOKEN_VALIDITY_HOURS, token_crypto};
use crate::access_ports::TemporaryAccessRecord;

impl AccessGrantService {
    /// Approves a pending request and issues its temporary access token.
    ///
    /// Idempotent: approving an already-approved request returns the token
    /// that was minted the first time. Approving a denied request is
    /// rejected, never silently accepted.
    pub async fn approve(
        &self,
        actor: &AdminIdentity,
        request_id: Uuid,
    ) -> AppResult<TemporaryAccessRecord> {
        let request = self.load_scoped_request(actor, request_id).await?;

        match request.status {
            RequestStatus::Denied => {
                return Err(AppError::InvalidState(
                    "cannot approve a request that was already denied".to_owned(),
                ));
            }
            RequestStatus::Approved => {}
            RequestStatus::Pending => {
                let moved = self
                    .requests
                    .transition(request_id, RequestStatus::Pending, RequestStatus::Approved)
                    .await?;

                if !moved {
                    // Lost a race; re-read to learn the winning decision.
                    let current = self.load_scoped_request(actor, request_id).await?;
                    if current.status == RequestStatus::Denied {
                        return Err(AppError::InvalidState(
                            "cannot approve a request that was already denied".to_owned(),
                        ));
                    }
                }
            }
        }

        // Exactly one token per approved request: the repository keeps the
        // first inserted row under concurrent approvals, so the freshly
        // generated value is discarded if another approval won.
        let token = token_crypto::generate_token()?;
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(TOKEN_VALIDITY_HOURS);

        self.tokens
            .create_or_get(request_id, &request.woreda_id, &token, expires_at)
            .await
    }

    /// Denies a pending request.
    ///
    /// Denying an already-denied request is a no-op; denying an approved
    /// request is rejected as an invalid transition.
    pub async fn deny(&self, actor: &AdminIdentity, request_id: Uuid) -> AppResult<()> {
        let request = self.load_scoped_request(actor, request_id).await?;

        match request.status {
            RequestStatus::Denied => Ok(()),
            RequestStatus::Approved => Err(AppError::InvalidState(
                "cannot deny a request that was already approved".to_owned(),
            )),
            RequestStatus::Pending => {
                let moved = self
                    .requests
                    .transition(request_id, RequestStatus::Pending, RequestStatus::Denied)
                    .await?;

                if !moved {
                    let current = self.load_scoped_request(actor, request_id).await?;
                    if current.status == RequestStatus::Approved {
                        return Err(AppError::InvalidState(
                            "cannot deny a request that was already approved".to_owned(),
                        ));
                    }
                }

                Ok(())
            }
        }
    }

    async fn load_scoped_request(
        &self,
        actor: &AdminIdentity,
        request_id: Uuid,
    ) -> AppResult<AccessRequest> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("access request '{request_id}' does not exist"))
            })?;

        if request.woreda_id != *actor.woreda_id() {
            return Err(AppError::Forbidden(
                "access request belongs to another woreda".to_owned(),
            ));
        }

        Ok(request)
    }
}
