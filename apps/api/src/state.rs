use portal_application::{
    AccessGrantService, AdminAuthService, DocumentService, FileProxyService, ResourceResolver,
};
use portal_core::WoredaId;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_grant_service: AccessGrantService,
    pub admin_auth_service: AdminAuthService,
    pub document_service: DocumentService,
    pub resource_resolver: ResourceResolver,
    pub file_proxy_service: FileProxyService,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub office_woreda_id: WoredaId,
}
