//! Wire types shared with the web frontend.

use portal_application::{ResolvedObject, TemporaryAccessRecord};
use portal_core::AdminIdentity;
use portal_domain::{AccessRequest, DocumentUpload, RequestStatusView};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/health-response.ts")]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for redeeming a QR code into an access request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../web/src/generated/create-access-request-request.ts"
)]
pub struct CreateAccessRequestRequest {
    pub code: String,
}

/// API representation of one access request.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/access-request-response.ts")]
pub struct AccessRequestResponse {
    pub id: String,
    pub code: String,
    pub status: String,
    pub ip_address: Option<String>,
    pub created_at: String,
}

impl From<AccessRequest> for AccessRequestResponse {
    fn from(request: AccessRequest) -> Self {
        Self {
            id: request.id.to_string(),
            code: request.code.to_string(),
            status: request.status.to_string(),
            ip_address: request.ip_address,
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// Poll answer for a pending or resolved request.
///
/// `token` is populated exactly when `status` is `approved`.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/request-status-response.ts")]
pub struct RequestStatusResponse {
    pub status: String,
    pub token: Option<String>,
}

impl From<RequestStatusView> for RequestStatusResponse {
    fn from(view: RequestStatusView) -> Self {
        match view {
            RequestStatusView::Pending => Self {
                status: "pending".to_owned(),
                token: None,
            },
            RequestStatusView::Approved { token } => Self {
                status: "approved".to_owned(),
                token: Some(token),
            },
            RequestStatusView::Denied => Self {
                status: "denied".to_owned(),
                token: None,
            },
        }
    }
}

/// Token issued by an approval decision.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/access-token-response.ts")]
pub struct AccessTokenResponse {
    pub token: String,
    pub expires_at: String,
}

impl From<TemporaryAccessRecord> for AccessTokenResponse {
    fn from(record: TemporaryAccessRecord) -> Self {
        Self {
            token: record.token,
            expires_at: record.expires_at.to_rfc3339(),
        }
    }
}

/// Freshly minted QR code and the URL it should encode.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/qr-code-response.ts")]
pub struct QrCodeResponse {
    pub code: String,
    pub request_url: String,
}

/// Resolved public URL for a stored object.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/public-url-response.ts")]
pub struct PublicUrlResponse {
    pub url: String,
    pub file_name: String,
    pub is_accessible: bool,
}

impl From<ResolvedObject> for PublicUrlResponse {
    fn from(resolved: ResolvedObject) -> Self {
        Self {
            url: resolved.public_url,
            file_name: resolved.file_name,
            is_accessible: resolved.is_accessible,
        }
    }
}

/// API representation of the authenticated administrator.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/admin-identity-response.ts")]
pub struct AdminIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub woreda_id: String,
}

impl From<&AdminIdentity> for AdminIdentityResponse {
    fn from(identity: &AdminIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().to_owned(),
            woreda_id: identity.woreda_id().to_string(),
        }
    }
}

/// Incoming payload for administrator login.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/auth-login-request.ts")]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload for first-admin bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/bootstrap-request.ts")]
pub struct BootstrapRequest {
    pub token: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Incoming payload for recording an uploaded document.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/save-document-request.ts")]
pub struct SaveDocumentRequest {
    pub category_id: String,
    pub subcategory_code: String,
    pub year: String,
    pub file_name: String,
    pub object_url: String,
}

/// API representation of one document upload record.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../web/src/generated/document-response.ts")]
pub struct DocumentResponse {
    pub id: String,
    pub category_id: String,
    pub subcategory_code: String,
    pub year: String,
    pub file_name: String,
    pub object_url: String,
    pub uploader_subject: String,
    pub created_at: String,
}

impl From<DocumentUpload> for DocumentResponse {
    fn from(upload: DocumentUpload) -> Self {
        Self {
            id: upload.id.to_string(),
            category_id: upload.category_id,
            subcategory_code: upload.subcategory_code,
            year: upload.year,
            file_name: upload.file_name,
            object_url: upload.object_url,
            uploader_subject: upload.uploader_subject,
            created_at: upload.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use portal_domain::RequestStatusView;

    use super::RequestStatusResponse;

    #[test]
    fn the_token_travels_only_with_an_approved_status() {
        let approved = RequestStatusResponse::from(RequestStatusView::Approved {
            token: "issued-token".to_owned(),
        });
        assert_eq!(approved.status, "approved");
        assert_eq!(approved.token.as_deref(), Some("issued-token"));

        let pending = RequestStatusResponse::from(RequestStatusView::Pending);
        assert_eq!(pending.status, "pending");
        assert!(pending.token.is_none());

        let denied = RequestStatusResponse::from(RequestStatusView::Denied);
        assert_eq!(denied.status, "denied");
        assert!(denied.token.is_none());
    }
}
